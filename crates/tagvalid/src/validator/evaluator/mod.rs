pub(crate) mod field;

use crate::config::ValidationConfig;
use crate::error::{self, Error};
use crate::record::ReflectRecord;

use super::registry::Registry;
use super::resolve::FieldRule;
use field::FieldEval;

/// Evaluator for every rule of one record type, in declaration order.
///
/// Built once per type and shared through the rule cache. Holds no
/// per-instance state.
pub(crate) struct RecordEval {
    full_name: String,
    fields: Vec<FieldEval>,
}

impl RecordEval {
    pub fn new(full_name: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: rules.into_iter().map(FieldEval::new).collect(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter().map(|f| &f.rule)
    }

    pub fn tautology(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn evaluate(
        &self,
        record: &dyn ReflectRecord,
        registry: &Registry,
        cfg: &ValidationConfig,
    ) -> Result<(), Error> {
        let mut acc: Option<Error> = None;
        for eval in &self.fields {
            let result = eval.evaluate(record, registry, cfg);
            let (cont, new_acc) = error::merge_violations(acc, result, cfg.fail_fast);
            acc = new_acc;
            if !cont {
                break;
            }
        }
        match acc {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

use crate::config::ValidationConfig;
use crate::error::{Error, ValidationError};
use crate::record::ReflectRecord;
use crate::value::Value;
use crate::violation::Violation;

use super::super::binder;
use super::super::registry::Registry;
use super::super::resolve::FieldRule;

/// Evaluator for one rule invocation on one field.
pub(crate) struct FieldEval {
    pub rule: FieldRule,
}

impl FieldEval {
    pub fn new(rule: FieldRule) -> Self {
        Self { rule }
    }

    /// Re-read the field, bind parameters and run the validator.
    pub fn evaluate(
        &self,
        record: &dyn ReflectRecord,
        registry: &Registry,
        cfg: &ValidationConfig,
    ) -> Result<(), Error> {
        let rule = &self.rule;

        // Registry entries are never removed, so this only misses when a
        // validator is handed a registry other than the one it resolved with.
        let Some(validator) = registry.lookup(rule.rule_name()) else {
            return Ok(());
        };
        let Some(value) = record.get_field(rule.field_name()) else {
            return Ok(());
        };
        // An opaque slot holding a whole record is composite.
        if matches!(value.resolve(), Some(Value::Record(_))) {
            tracing::trace!(
                field = rule.field_name(),
                rule = rule.rule_name(),
                "opaque slot holds a record, rule skipped"
            );
            return Ok(());
        }

        let params = binder::bind(rule, validator.params(), cfg.coercion)?;

        let modifiers = rule.modifiers();
        let rendered = value.to_string();
        if modifiers.include.as_deref() == Some(rendered.as_str()) {
            tracing::trace!(
                field = rule.field_name(),
                rule = rule.rule_name(),
                "value included, rule skipped"
            );
            return Ok(());
        }
        let excluded = modifiers.exclude.as_deref() == Some(rendered.as_str());

        let passed = !excluded && validator.check(&value, &params);
        tracing::trace!(
            field = rule.field_name(),
            rule = rule.rule_name(),
            value = %rendered,
            passed,
            "evaluated rule"
        );
        if passed {
            return Ok(());
        }

        let mut violation = Violation::new(rule.field_name(), rule.rule_name(), value);
        if let Some(note) = &modifiers.message {
            violation = violation.with_note(note.as_str());
        }
        Err(ValidationError::single(violation).into())
    }
}

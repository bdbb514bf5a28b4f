use crate::record::RecordDescriptor;

use super::registry::Registry;
use super::tag::{Modifiers, parse_tag};

/// A resolved rule invocation bound to one field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    field_name: String,
    rule_name: String,
    raw_params: Vec<String>,
    modifiers: Modifiers,
}

impl FieldRule {
    pub(crate) fn new(
        field_name: impl Into<String>,
        rule_name: impl Into<String>,
        raw_params: Vec<String>,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            rule_name: rule_name.into(),
            raw_params,
            modifiers,
        }
    }

    /// The field the rule applies to.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The registered rule name.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Positional parameters as written in the tag.
    #[must_use]
    pub fn raw_params(&self) -> &[String] {
        &self.raw_params
    }

    /// Keyword modifiers.
    #[must_use]
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }
}

/// Compute the ordered rules for a record type.
///
/// Untagged and composite fields are skipped. Invocations naming rules the
/// registry does not know are dropped.
pub(crate) fn resolve_rules(desc: &RecordDescriptor, registry: &Registry) -> Vec<FieldRule> {
    let mut rules = Vec::new();
    for field in desc.fields() {
        let Some(tag) = field.tag() else {
            continue;
        };
        if !field.kind().is_scalar() {
            tracing::trace!(
                record = desc.full_name(),
                field = field.name(),
                kind = %field.kind(),
                "skipping tagged composite field"
            );
            continue;
        }

        for invocation in parse_tag(tag) {
            if !registry.contains(&invocation.name) {
                tracing::debug!(
                    record = desc.full_name(),
                    field = field.name(),
                    rule = %invocation.name,
                    "dropping unregistered rule"
                );
                continue;
            }
            rules.push(FieldRule::new(
                field.name(),
                invocation.name,
                invocation.params,
                invocation.modifiers,
            ));
        }
    }
    rules
}

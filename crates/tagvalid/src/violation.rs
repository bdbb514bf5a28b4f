use std::fmt;

use crate::value::Value;

/// Prefix shared by every message this crate produces.
pub(crate) const NAMESPACE: &str = "tagvalid";

/// A single field that failed one of its rules.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Violation {
    field_name: String,
    rule_name: String,
    value: Value,
    note: Option<String>,
    message: String,
}

impl Violation {
    pub(crate) fn new(
        field_name: impl Into<String>,
        rule_name: impl Into<String>,
        value: Value,
    ) -> Self {
        let mut out = Self {
            field_name: field_name.into(),
            rule_name: rule_name.into(),
            value,
            note: None,
            message: String::new(),
        };
        out.compose_message();
        out
    }

    /// Attach the custom text from a `message='...'` modifier.
    pub(crate) fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.is_empty() { None } else { Some(note) };
        self.compose_message();
        self
    }

    fn compose_message(&mut self) {
        let mut message = format!(
            "{NAMESPACE}: field '{}' failed validator '{}' with value '{}'",
            self.field_name, self.rule_name, self.value
        );
        if let Some(note) = &self.note {
            message.push_str(". ");
            message.push_str(note);
        }
        self.message = message;
    }

    /// The name of the field that failed.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The name of the rule that failed.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The field's value at the time of validation.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The custom text supplied by a `message` modifier, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// The full human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "field": self.field_name,
            "rule": self.rule_name,
            "value": self.value.to_json(),
            "message": self.message,
        })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Violation;
    use crate::value::Value;

    #[test]
    fn message_follows_the_field_rule_value_format() {
        let violation = Violation::new("Foo", "Test", Value::Int(1));
        assert_eq!(
            violation.to_string(),
            "tagvalid: field 'Foo' failed validator 'Test' with value '1'"
        );
        assert_eq!(violation.field_name(), "Foo");
        assert_eq!(violation.rule_name(), "Test");
        assert_eq!(violation.value(), &Value::Int(1));
        assert_eq!(violation.note(), None);
    }

    #[test]
    fn note_is_appended_and_empty_notes_are_ignored() {
        let noted = Violation::new("Size", "Min", Value::Int(1)).with_note("too small");
        assert_eq!(
            noted.message(),
            "tagvalid: field 'Size' failed validator 'Min' with value '1'. too small"
        );

        let blank = Violation::new("Size", "Min", Value::Int(1)).with_note("");
        assert_eq!(blank.note(), None);
        assert!(blank.message().ends_with("with value '1'"));
    }
}

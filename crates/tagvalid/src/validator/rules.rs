//! Built-in validators registered by [`Registry::with_builtins`](super::Registry::with_builtins).
//!
//! Numbers are compared by value and strings by character count. Opaque
//! slots are unwrapped first; an empty slot fails every rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::value::Value;

use super::binder::{BoundParams, ParamField, Params};
use super::registry::ValidatorDescriptor;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^[-a-z0-9~!$%^&*_=+}{'?]+(\.[-a-z0-9~!$%^&*_=+}{'?]+)*",
        r"@([a-z0-9_][-a-z0-9_]*(\.[-a-z0-9_]+)*",
        r"\.(aero|arpa|biz|com|coop|edu|gov|info|int|mil|museum|name|net|org|pro|travel|mobi|[a-z][a-z])",
        r"|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))",
        r"(:[0-9]{1,5})?$",
    ))
    .expect("email regex must compile")
});

pub(crate) struct MinParams {
    min: i64,
}

impl Params for MinParams {
    const SHAPE: &'static [ParamField] = &[ParamField::int("min")];

    fn from_bound(params: &BoundParams) -> Self {
        Self {
            min: params.int(0),
        }
    }
}

pub(crate) struct RangeParams {
    min: i64,
    max: i64,
}

impl Params for RangeParams {
    const SHAPE: &'static [ParamField] = &[ParamField::int("min"), ParamField::int("max")];

    fn from_bound(params: &BoundParams) -> Self {
        Self {
            min: params.int(0),
            max: params.int(1),
        }
    }
}

pub(crate) struct ContainsParams {
    needle: String,
}

impl Params for ContainsParams {
    const SHAPE: &'static [ParamField] = &[ParamField::string("needle")];

    fn from_bound(params: &BoundParams) -> Self {
        Self {
            needle: params.str(0).to_string(),
        }
    }
}

pub(crate) fn builtins() -> Vec<ValidatorDescriptor> {
    vec![
        ValidatorDescriptor::typed::<()>("NotEmpty", |value, _| not_empty(value)),
        ValidatorDescriptor::typed::<MinParams>("Min", |value, p| min(value, p.min)),
        ValidatorDescriptor::typed::<RangeParams>("Range", |value, p| {
            range(value, p.min, p.max)
        }),
        ValidatorDescriptor::typed::<ContainsParams>("Contains", |value, p| {
            contains(value, &p.needle)
        }),
        ValidatorDescriptor::typed::<()>("Email", |value, _| email(value)),
    ]
}

/// Numeric magnitude used for bound checks. Strings measure their length.
enum Measure {
    Int(i128),
    Float(f64),
}

fn measure(value: &Value) -> Option<Measure> {
    match value.resolve()? {
        Value::Int(v) => Some(Measure::Int(i128::from(*v))),
        Value::Uint(v) => Some(Measure::Int(i128::from(*v))),
        Value::Float(v) => Some(Measure::Float(*v)),
        Value::String(s) => Some(Measure::Int(
            i128::try_from(s.chars().count()).unwrap_or(i128::MAX),
        )),
        Value::Opaque(_) | Value::Record(_) => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn at_least(m: &Measure, bound: i64) -> bool {
    match m {
        Measure::Int(v) => *v >= i128::from(bound),
        Measure::Float(v) => *v >= bound as f64,
    }
}

#[allow(clippy::cast_precision_loss)]
fn at_most(m: &Measure, bound: i64) -> bool {
    match m {
        Measure::Int(v) => *v <= i128::from(bound),
        Measure::Float(v) => *v <= bound as f64,
    }
}

pub(crate) fn not_empty(value: &Value) -> bool {
    match value.resolve() {
        Some(Value::Int(v)) => *v != 0,
        Some(Value::Uint(v)) => *v != 0,
        Some(Value::Float(v)) => *v != 0.0,
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

pub(crate) fn min(value: &Value, min: i64) -> bool {
    measure(value).is_some_and(|m| at_least(&m, min))
}

pub(crate) fn range(value: &Value, min: i64, max: i64) -> bool {
    measure(value).is_some_and(|m| at_least(&m, min) && at_most(&m, max))
}

pub(crate) fn contains(value: &Value, needle: &str) -> bool {
    value.as_str().is_some_and(|s| s.contains(needle))
}

pub(crate) fn email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::{contains, email, min, not_empty, range};
    use crate::value::Value;

    #[test]
    fn not_empty_rejects_zero_values() {
        assert!(not_empty(&Value::Int(-1)));
        assert!(not_empty(&Value::from("x")));
        assert!(not_empty(&Value::Float(0.5)));
        assert!(!not_empty(&Value::Int(0)));
        assert!(!not_empty(&Value::Uint(0)));
        assert!(!not_empty(&Value::from("")));
        assert!(!not_empty(&Value::Opaque(None)));
        assert!(not_empty(&Value::from(Some("set"))));
    }

    #[test]
    fn min_compares_numbers_by_value_and_strings_by_length() {
        assert!(!min(&Value::Int(2), 3));
        assert!(min(&Value::Int(3), 3));
        assert!(min(&Value::Uint(u64::MAX), 3));
        assert!(min(&Value::Float(3.5), 3));
        assert!(min(&Value::from("héllo"), 5));
        assert!(!min(&Value::from("héllo"), 6));
        assert!(!min(&Value::Opaque(None), 0));
    }

    #[test]
    fn range_is_inclusive() {
        assert!(range(&Value::Int(5), 4, 9));
        assert!(range(&Value::Int(4), 4, 9));
        assert!(range(&Value::Int(9), 4, 9));
        assert!(!range(&Value::Int(10), 4, 9));
        assert!(!range(&Value::Uint(3), 4, 9));
        assert!(range(&Value::from("four"), 4, 9));
        assert!(!range(&Value::from("abc"), 4, 9));
    }

    #[test]
    fn contains_only_applies_to_strings() {
        assert!(contains(&Value::from("using"), "us"));
        assert!(!contains(&Value::from("sing"), "us"));
        assert!(contains(&Value::from("anything"), ""));
        assert!(!contains(&Value::Int(12), "1"));
    }

    #[test]
    fn email_requires_a_known_tld_or_ipv4_host() {
        for valid in [
            "bob@boblaw.com",
            "first.last@sub.example.org",
            "a@example.io",
            "ops@10.0.0.1",
            "ops@example.com:2525",
            "Bob@BobLaw.COM",
        ] {
            assert!(email(&Value::from(valid)), "{valid} should be valid");
        }
        for invalid in [
            "bob@boblaw.c",
            "bob",
            "@boblaw.com",
            "bob@",
            "bob@boblaw.com trailing",
            "",
        ] {
            assert!(!email(&Value::from(invalid)), "{invalid} should be invalid");
        }
        assert!(!email(&Value::Int(1)));
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::{CoercionError, Error, ParameterMismatchError};

use super::resolve::FieldRule;
use super::tag::unquote;

/// The type of one validator parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Base-10 signed integer.
    Int,
    /// Base-10 unsigned integer.
    Uint,
    /// Decimal floating point.
    Float,
    /// Single-quoted string literal.
    String,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
        })
    }
}

/// One declared field of a validator's parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamField {
    /// Parameter name, used in error messages.
    pub name: &'static str,
    /// Parameter type.
    pub kind: ParamKind,
}

impl ParamField {
    /// A signed integer parameter.
    #[must_use]
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
        }
    }

    /// An unsigned integer parameter.
    #[must_use]
    pub const fn uint(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Uint,
        }
    }

    /// A floating point parameter.
    #[must_use]
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
        }
    }

    /// A string parameter.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::String,
        }
    }
}

/// A parameter value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point.
    Float(f64),
    /// String with its quotes removed.
    String(String),
}

/// Parameters bound for one validator call, in declaration order.
///
/// A fresh instance is built for every invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams(Vec<ParamValue>);

impl BoundParams {
    /// Wrap already coerced values.
    #[must_use]
    pub fn new(values: Vec<ParamValue>) -> Self {
        Self(values)
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The parameter at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ParamValue> {
        self.0.get(index)
    }

    /// The parameter at `index` as `i64`, or zero.
    #[must_use]
    pub fn int(&self, index: usize) -> i64 {
        match self.get(index) {
            Some(ParamValue::Int(v)) => *v,
            _ => 0,
        }
    }

    /// The parameter at `index` as `u64`, or zero.
    #[must_use]
    pub fn uint(&self, index: usize) -> u64 {
        match self.get(index) {
            Some(ParamValue::Uint(v)) => *v,
            _ => 0,
        }
    }

    /// The parameter at `index` as `f64`, or zero.
    #[must_use]
    pub fn float(&self, index: usize) -> f64 {
        match self.get(index) {
            Some(ParamValue::Float(v)) => *v,
            _ => 0.0,
        }
    }

    /// The parameter at `index` as `&str`, or empty.
    #[must_use]
    pub fn str(&self, index: usize) -> &str {
        match self.get(index) {
            Some(ParamValue::String(v)) => v,
            _ => "",
        }
    }
}

/// A typed parameter record for a validator.
///
/// ```rust
/// use tagvalid::{BoundParams, ParamField, Params};
///
/// struct Between {
///     low: i64,
///     high: i64,
/// }
///
/// impl Params for Between {
///     const SHAPE: &'static [ParamField] = &[ParamField::int("low"), ParamField::int("high")];
///
///     fn from_bound(params: &BoundParams) -> Self {
///         Self {
///             low: params.int(0),
///             high: params.int(1),
///         }
///     }
/// }
/// ```
pub trait Params: Sized {
    /// Declared parameter fields, in order.
    const SHAPE: &'static [ParamField];

    /// Build the record from values bound against [`Self::SHAPE`].
    fn from_bound(params: &BoundParams) -> Self;
}

impl Params for () {
    const SHAPE: &'static [ParamField] = &[];

    fn from_bound(_params: &BoundParams) -> Self {}
}

/// How raw parameters that fail to convert are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Coercion {
    /// Bind the zero value (numbers) or the empty string (unquoted strings).
    #[default]
    Lenient,
    /// Fail the call with [`Error::Coercion`].
    Strict,
}

/// Coerce the raw parameters of `rule` into the declared `shape`.
pub(crate) fn bind(
    rule: &FieldRule,
    shape: &[ParamField],
    coercion: Coercion,
) -> Result<BoundParams, Error> {
    let raw = rule.raw_params();
    if raw.len() != shape.len() {
        return Err(ParameterMismatchError {
            field: rule.field_name().to_string(),
            rule: rule.rule_name().to_string(),
            provided: raw.len(),
            required: shape.len(),
        }
        .into());
    }

    shape
        .iter()
        .zip(raw)
        .map(|(param, token)| {
            coerce(param.kind, token).map_or_else(
                || match coercion {
                    Coercion::Lenient => Ok(zero_value(param.kind)),
                    Coercion::Strict => Err(Error::from(CoercionError {
                        field: rule.field_name().to_string(),
                        rule: rule.rule_name().to_string(),
                        param: param.name.to_string(),
                        raw: token.clone(),
                        kind: param.kind,
                    })),
                },
                Ok,
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .map(BoundParams)
}

fn coerce(kind: ParamKind, token: &str) -> Option<ParamValue> {
    match kind {
        ParamKind::Int => parse(token).map(ParamValue::Int),
        ParamKind::Uint => parse(token).map(ParamValue::Uint),
        ParamKind::Float => parse(token).map(ParamValue::Float),
        ParamKind::String => unquote(token).map(|s| ParamValue::String(s.to_string())),
    }
}

fn parse<T: FromStr>(token: &str) -> Option<T> {
    token.parse().ok()
}

fn zero_value(kind: ParamKind) -> ParamValue {
    match kind {
        ParamKind::Int => ParamValue::Int(0),
        ParamKind::Uint => ParamValue::Uint(0),
        ParamKind::Float => ParamValue::Float(0.0),
        ParamKind::String => ParamValue::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{BoundParams, Coercion, ParamField, ParamValue, bind};
    use crate::error::Error;
    use crate::validator::resolve::FieldRule;
    use crate::validator::tag::Modifiers;

    fn rule(params: &[&str]) -> FieldRule {
        FieldRule::new(
            "Foo",
            "Test",
            params.iter().map(ToString::to_string).collect(),
            Modifiers::default(),
        )
    }

    const SHAPE: &[ParamField] = &[
        ParamField::int("a"),
        ParamField::uint("b"),
        ParamField::float("c"),
        ParamField::string("d"),
    ];

    #[test]
    fn binds_each_field_by_declared_kind() {
        let bound = bind(&rule(&["-4", "19", "2.5", "'us'"]), SHAPE, Coercion::Lenient)
            .expect("well-formed parameters bind");
        assert_eq!(
            bound,
            BoundParams::new(vec![
                ParamValue::Int(-4),
                ParamValue::Uint(19),
                ParamValue::Float(2.5),
                ParamValue::String("us".to_string()),
            ])
        );
        assert_eq!(bound.int(0), -4);
        assert_eq!(bound.uint(1), 19);
        assert!((bound.float(2) - 2.5).abs() < f64::EPSILON);
        assert_eq!(bound.str(3), "us");
    }

    #[test]
    fn lenient_mode_binds_zero_values_on_parse_failure() {
        let bound = bind(&rule(&["x", "-1", "nope", "us"]), SHAPE, Coercion::Lenient)
            .expect("lenient binding never fails on content");
        assert_eq!(
            bound,
            BoundParams::new(vec![
                ParamValue::Int(0),
                ParamValue::Uint(0),
                ParamValue::Float(0.0),
                ParamValue::String(String::new()),
            ])
        );
    }

    #[test]
    fn strict_mode_reports_the_offending_parameter() {
        let err = bind(&rule(&["1", "2", "3.0", "us"]), SHAPE, Coercion::Strict)
            .expect_err("unquoted string must fail in strict mode");
        let Error::Coercion(err) = err else {
            panic!("expected coercion error, got {err}");
        };
        assert_eq!(err.param, "d");
        assert_eq!(err.raw, "us");
        assert_eq!(err.field, "Foo");
    }

    #[test]
    fn count_mismatch_is_a_named_error() {
        let err = bind(&rule(&["1"]), SHAPE, Coercion::Lenient)
            .expect_err("wrong arity must fail");
        assert_eq!(
            err.to_string(),
            "tagvalid: validator 'Test' on field 'Foo' has a parameter mismatch. Providing 1, require 4"
        );
    }

    #[test]
    fn empty_shape_binds_nothing() {
        let bound = bind(&rule(&[]), &[], Coercion::Strict).expect("no params");
        assert!(bound.is_empty());
        assert_eq!(bound.str(0), "");
    }
}

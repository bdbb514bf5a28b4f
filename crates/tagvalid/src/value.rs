use std::fmt;

use crate::record::DynamicRecord;

/// The declared kind of a record field.
///
/// Only scalar-like kinds can carry validation rules. Composite kinds are
/// skipped during rule resolution even when their field is tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// Signed integer (`i8` through `i64`, `isize`).
    Int,
    /// Unsigned integer (`u8` through `u64`, `usize`).
    Uint,
    /// Floating point (`f32`, `f64`).
    Float,
    /// Text.
    String,
    /// An opaque slot that may hold any scalar value, or nothing.
    ///
    /// Rules are skipped when the slot holds a record at validation time.
    Any,
    /// A nested record.
    Record,
    /// An ordered sequence.
    List,
    /// A key/value mapping.
    Map,
    /// A function value.
    Func,
    /// A channel endpoint.
    Channel,
}

impl Kind {
    /// Returns true if fields of this kind are eligible for rule attachment.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Uint | Self::Float | Self::String | Self::Any
        )
    }

    /// The value an unset field of this kind reads as, if it has one.
    #[must_use]
    pub fn zero_value(self) -> Option<Value> {
        match self {
            Self::Int => Some(Value::Int(0)),
            Self::Uint => Some(Value::Uint(0)),
            Self::Float => Some(Value::Float(0.0)),
            Self::String => Some(Value::String(String::new())),
            Self::Any => Some(Value::Opaque(None)),
            Self::Record | Self::List | Self::Map | Self::Func | Self::Channel => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Any => "any",
            Self::Record => "record",
            Self::List => "list",
            Self::Map => "map",
            Self::Func => "func",
            Self::Channel => "channel",
        };
        f.write_str(name)
    }
}

/// A field value read from a record instance.
///
/// Validators match on this closed set of variants instead of inspecting
/// types at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An opaque slot holding another value, or nothing.
    Opaque(Option<Box<Value>>),
    /// A whole record, used when a candidate is passed dynamically.
    Record(DynamicRecord),
}

impl Value {
    /// Unwraps opaque slots down to the concrete value they hold.
    ///
    /// Returns `None` for an empty slot.
    #[must_use]
    pub fn resolve(&self) -> Option<&Value> {
        match self {
            Self::Opaque(Some(inner)) => inner.resolve(),
            Self::Opaque(None) => None,
            other => Some(other),
        }
    }

    /// The kind of this value. Opaque slots report [`Kind::Any`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Float(_) => Kind::Float,
            Self::String(_) => Kind::String,
            Self::Opaque(_) => Kind::Any,
            Self::Record(_) => Kind::Record,
        }
    }

    /// Returns the value as `i64` if it is a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.resolve()? {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is an unsigned integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.resolve()? {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is a floating point number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.resolve()? {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `&str` if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.resolve()? {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the record if this value is (or wraps) a record.
    #[must_use]
    pub fn as_record(&self) -> Option<&DynamicRecord> {
        match self.resolve()? {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Uint(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Opaque(None) => serde_json::Value::Null,
            Self::Opaque(Some(inner)) => inner.to_json(),
            Self::Record(r) => serde_json::Value::String(r.descriptor_ref().full_name().to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Opaque(None) => f.write_str("<nil>"),
            Self::Opaque(Some(inner)) => write!(f, "{inner}"),
            Self::Record(r) => write!(f, "{{{}}}", r.descriptor_ref().full_name()),
        }
    }
}

macro_rules! value_from_lossless {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Self::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

value_from_lossless!(Int, i64, i8, i16, i32, i64);
value_from_lossless!(Uint, u64, u8, u16, u32, u64);
value_from_lossless!(Float, f64, f32, f64);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DynamicRecord> for Value {
    fn from(v: DynamicRecord) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v.map(Into::into) {
            Some(inner @ Self::Opaque(_)) => inner,
            Some(inner) => Self::Opaque(Some(Box::new(inner))),
            None => Self::Opaque(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Kind, Value};

    #[test]
    fn display_renders_bare_scalars() {
        assert_eq!(Value::Int(-2).to_string(), "-2");
        assert_eq!(Value::Uint(7).to_string(), "7");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::from("bob").to_string(), "bob");
        assert_eq!(Value::Opaque(None).to_string(), "<nil>");
        assert_eq!(Value::from(Some(3_i32)).to_string(), "3");
    }

    #[test]
    fn resolve_unwraps_nested_opaque_slots() {
        let nested = Value::Opaque(Some(Box::new(Value::Opaque(Some(Box::new(Value::Int(4)))))));
        assert_eq!(nested.resolve(), Some(&Value::Int(4)));
        assert_eq!(nested.as_i64(), Some(4));
        assert_eq!(nested.kind(), Kind::Any);
        assert!(Value::Opaque(None).resolve().is_none());
    }

    #[test]
    fn option_conversion_does_not_double_wrap() {
        let inner = Value::from(Some("x"));
        let outer = Value::from(Some(inner.clone()));
        assert_eq!(outer, inner);
        assert_eq!(Value::from(None::<i64>), Value::Opaque(None));
    }

    #[test]
    fn scalar_kinds_are_eligible_and_composites_are_not() {
        for kind in [Kind::Int, Kind::Uint, Kind::Float, Kind::String, Kind::Any] {
            assert!(kind.is_scalar(), "{kind} should be scalar");
            assert!(kind.zero_value().is_some());
        }
        for kind in [Kind::Record, Kind::List, Kind::Map, Kind::Func, Kind::Channel] {
            assert!(!kind.is_scalar(), "{kind} should be composite");
            assert!(kind.zero_value().is_none());
        }
    }
}

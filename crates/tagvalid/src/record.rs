use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::value::{Kind, Value};

/// Describes one field of a record: its name, kind and rule tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: Kind,
    tag: Option<String>,
}

impl FieldDescriptor {
    /// Create an untagged field.
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            tag: None,
        }
    }

    /// Attach a rule declaration such as `"Min(3); Range(4,9)"`.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The raw rule declaration, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct RecordDescriptorInner {
    full_name: String,
    fields: Vec<FieldDescriptor>,
}

/// The shape of a record type: its fully qualified name and its fields in
/// declaration order.
///
/// Cheap to clone. The full name identifies the type in the rule cache, so
/// two distinct types must never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    inner: Arc<RecordDescriptorInner>,
}

impl RecordDescriptor {
    /// Create a descriptor from a fully qualified type name and its fields.
    pub fn new(
        full_name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Self {
        Self {
            inner: Arc::new(RecordDescriptorInner {
                full_name: full_name.into(),
                fields: fields.into_iter().collect(),
            }),
        }
    }

    /// The fully qualified type name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.inner.full_name
    }

    /// All fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.inner.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get_field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.inner.fields.iter().find(|f| f.name == name)
    }
}

/// Read access to a record's shape and current field values.
///
/// Implemented by [`reflect_record!`](crate::reflect_record) for plain structs
/// and by [`DynamicRecord`] for records assembled at runtime.
pub trait ReflectRecord {
    /// The shape of this record.
    fn descriptor(&self) -> RecordDescriptor;

    /// The current value of a scalar field, or `None` if the field does not
    /// exist or is not scalar.
    fn get_field(&self, name: &str) -> Option<Value>;
}

/// A record type whose shape is known without an instance.
///
/// Lets a type be registered (cache priming) before any instance exists.
pub trait RecordType: ReflectRecord {
    /// The shape shared by every instance of this type.
    fn record_descriptor() -> RecordDescriptor;
}

impl<T: ReflectRecord + ?Sized> ReflectRecord for &T {
    fn descriptor(&self) -> RecordDescriptor {
        (**self).descriptor()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        (**self).get_field(name)
    }
}

impl<T: ReflectRecord + ?Sized> ReflectRecord for &mut T {
    fn descriptor(&self) -> RecordDescriptor {
        (**self).descriptor()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        (**self).get_field(name)
    }
}

/// A record built at runtime from a descriptor and a set of values.
///
/// Unset scalar fields read as the zero value of their kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    descriptor: RecordDescriptor,
    values: HashMap<String, Value>,
}

impl DynamicRecord {
    /// Create an empty record of the given shape.
    #[must_use]
    pub fn new(descriptor: RecordDescriptor) -> Self {
        Self {
            descriptor,
            values: HashMap::new(),
        }
    }

    /// Set a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set a field value, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    pub(crate) fn descriptor_ref(&self) -> &RecordDescriptor {
        &self.descriptor
    }
}

impl ReflectRecord for DynamicRecord {
    fn descriptor(&self) -> RecordDescriptor {
        self.descriptor.clone()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        let field = self.descriptor.get_field_by_name(name)?;
        if !field.kind().is_scalar() {
            return None;
        }
        self.values
            .get(name)
            .cloned()
            .or_else(|| field.kind().zero_value())
    }
}

/// Maps a Rust field type to its [`Kind`] and reads it as a [`Value`].
///
/// Used by [`reflect_record!`](crate::reflect_record). Composite types report
/// their kind but never produce a value.
pub trait FieldType {
    /// The kind reported for fields of this type.
    const KIND: Kind;

    /// Read the field, or `None` for composite kinds.
    fn to_value(&self) -> Option<Value>;
}

macro_rules! field_type_scalar {
    ($kind:ident, $($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                const KIND: Kind = Kind::$kind;

                fn to_value(&self) -> Option<Value> {
                    Some(Value::from(*self))
                }
            }
        )+
    };
}

field_type_scalar!(Int, i8, i16, i32, i64);
field_type_scalar!(Uint, u8, u16, u32, u64);
field_type_scalar!(Float, f32, f64);

impl FieldType for isize {
    const KIND: Kind = Kind::Int;

    fn to_value(&self) -> Option<Value> {
        i64::try_from(*self).ok().map(Value::Int)
    }
}

impl FieldType for usize {
    const KIND: Kind = Kind::Uint;

    fn to_value(&self) -> Option<Value> {
        u64::try_from(*self).ok().map(Value::Uint)
    }
}

impl FieldType for String {
    const KIND: Kind = Kind::String;

    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

impl FieldType for &str {
    const KIND: Kind = Kind::String;

    fn to_value(&self) -> Option<Value> {
        Some(Value::String((*self).to_string()))
    }
}

impl FieldType for Value {
    const KIND: Kind = Kind::Any;

    fn to_value(&self) -> Option<Value> {
        match self {
            Value::Opaque(_) => Some(self.clone()),
            other => Some(Value::Opaque(Some(Box::new(other.clone())))),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: Kind = Kind::Any;

    fn to_value(&self) -> Option<Value> {
        let inner = self.as_ref().and_then(FieldType::to_value);
        Some(Value::from(inner))
    }
}

macro_rules! field_type_composite {
    ($kind:ident, $([$($generics:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> FieldType for $ty {
                const KIND: Kind = Kind::$kind;

                fn to_value(&self) -> Option<Value> {
                    None
                }
            }
        )+
    };
}

field_type_composite!(
    List,
    [T] Vec<T>,
    [T, const N: usize] [T; N],
);
field_type_composite!(
    Map,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
);
field_type_composite!(
    Channel,
    [T] Sender<T>,
    [T] SyncSender<T>,
    [T] Receiver<T>,
);
field_type_composite!(
    Func,
    [R] fn() -> R,
    [A, R] fn(A) -> R,
    [A, B, R] fn(A, B) -> R,
);

impl FieldType for DynamicRecord {
    const KIND: Kind = Kind::Record;

    fn to_value(&self) -> Option<Value> {
        None
    }
}

#[doc(hidden)]
pub fn field_descriptor<T: FieldType>(name: &str, tag: Option<&str>) -> FieldDescriptor {
    let field = FieldDescriptor::new(name, T::KIND);
    match tag {
        Some(tag) => field.with_tag(tag),
        None => field,
    }
}

/// Declare a struct whose fields carry `#[valid("...")]` rule tags and
/// implement [`ReflectRecord`] and [`RecordType`] for it.
///
/// ```rust
/// tagvalid::reflect_record! {
///     #[derive(Debug, Default)]
///     pub struct Signup {
///         /// Display name.
///         #[valid("NotEmpty")]
///         pub name: String,
///         #[valid("Min(18); Range(18, 130)")]
///         pub age: u32,
///         pub note: String,
///     }
/// }
///
/// let signup = Signup { name: String::new(), age: 30, note: String::new() };
/// assert!(tagvalid::Validator::new().validate(&signup).is_err());
/// ```
///
/// Field attributes are limited to doc comments followed by an optional
/// `#[valid(...)]`. Nested records are reported with [`Kind::Record`] and are
/// never validated.
#[macro_export]
macro_rules! reflect_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[valid($tag:literal)])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::RecordType for $name {
            fn record_descriptor() -> $crate::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::LazyLock<$crate::RecordDescriptor> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::RecordDescriptor::new(
                            ::std::any::type_name::<$name>(),
                            [
                                $(
                                    $crate::__field_descriptor::<$ty>(
                                        ::std::stringify!($field),
                                        ::std::option::Option::<&str>::None
                                            $(.or(::std::option::Option::Some($tag)))?,
                                    ),
                                )*
                            ],
                        )
                    });
                ::std::clone::Clone::clone(&*DESCRIPTOR)
            }
        }

        impl $crate::ReflectRecord for $name {
            fn descriptor(&self) -> $crate::RecordDescriptor {
                <Self as $crate::RecordType>::record_descriptor()
            }

            #[allow(unused_variables)]
            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                $(
                    if name == ::std::stringify!($field) {
                        return $crate::FieldType::to_value(&self.$field);
                    }
                )*
                ::std::option::Option::None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DynamicRecord, FieldDescriptor, RecordDescriptor, RecordType, ReflectRecord};
    use crate::value::{Kind, Value};

    crate::reflect_record! {
        #[derive(Debug, Default)]
        struct Sample {
            /// Documented and tagged.
            #[valid("NotEmpty")]
            name: String,
            #[valid("Min(3)")]
            age: u8,
            ratio: f32,
            anything: Option<i64>,
            #[valid("NotEmpty")]
            items: Vec<i64>,
        }
    }

    #[test]
    fn macro_descriptor_captures_names_kinds_and_tags() {
        let desc = Sample::record_descriptor();
        assert!(desc.full_name().ends_with("::Sample"));

        let summary: Vec<(&str, Kind, Option<&str>)> = desc
            .fields()
            .iter()
            .map(|f| (f.name(), f.kind(), f.tag()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("name", Kind::String, Some("NotEmpty")),
                ("age", Kind::Uint, Some("Min(3)")),
                ("ratio", Kind::Float, None),
                ("anything", Kind::Any, None),
                ("items", Kind::List, Some("NotEmpty")),
            ]
        );
    }

    #[test]
    fn macro_reads_current_values() {
        let mut sample = Sample {
            name: "ann".to_string(),
            age: 4,
            ..Sample::default()
        };
        assert_eq!(sample.get_field("name"), Some(Value::from("ann")));
        assert_eq!(sample.get_field("age"), Some(Value::Uint(4)));
        assert_eq!(sample.get_field("anything"), Some(Value::Opaque(None)));
        assert_eq!(sample.get_field("items"), None);
        assert_eq!(sample.get_field("missing"), None);

        sample.anything = Some(9);
        assert_eq!(sample.get_field("anything").and_then(|v| v.as_i64()), Some(9));
        assert_eq!(sample.descriptor(), Sample::record_descriptor());
    }

    #[test]
    fn dynamic_record_reads_zero_values_for_unset_scalars() {
        let desc = RecordDescriptor::new(
            "demo.Account",
            [
                FieldDescriptor::new("id", Kind::Int),
                FieldDescriptor::new("owner", Kind::String).with_tag("NotEmpty"),
                FieldDescriptor::new("tags", Kind::List).with_tag("NotEmpty"),
            ],
        );
        let record = DynamicRecord::new(desc).with_field("id", 12_i64);

        assert_eq!(record.get_field("id"), Some(Value::Int(12)));
        assert_eq!(record.get_field("owner"), Some(Value::String(String::new())));
        assert_eq!(record.get_field("tags"), None);
        assert_eq!(record.get_field("nope"), None);
    }
}

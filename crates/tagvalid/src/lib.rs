//! Declarative, tag-based validation for plain Rust records.
//!
//! Fields carry rule declarations such as `"NotEmpty"` or
//! `"Min(3); Range(4, 9)"`. A [`Validator`] parses each record type's
//! declarations once, caches the resolved rules, and evaluates them against
//! the current field values of every instance it is given.
//!
//! # Quick start
//!
//! ```rust
//! tagvalid::reflect_record! {
//!     pub struct Post {
//!         #[valid("NotEmpty")]
//!         pub title: String,
//!         #[valid("Min(3)")]
//!         pub views: u32,
//!         #[valid("Email")]
//!         pub author: String,
//!     }
//! }
//!
//! let post = Post {
//!     title: String::new(),
//!     views: 2,
//!     author: "bob@boblaw.com".to_string(),
//! };
//!
//! match tagvalid::validate(&post) {
//!     Ok(()) => unreachable!(),
//!     Err(err) => {
//!         let violations = err.violations().unwrap_or_default();
//!         assert_eq!(violations.len(), 2);
//!         assert_eq!(
//!             violations[1].to_string(),
//!             "tagvalid: field 'views' failed validator 'Min' with value '2'"
//!         );
//!     }
//! }
//! ```
//!
//! For isolated rule sets, construct a [`Validator`] and register custom
//! rules on it:
//!
//! ```rust
//! use tagvalid::{Validator, ValidatorDescriptor};
//!
//! let validator = Validator::new();
//! validator.register_validator(ValidatorDescriptor::typed::<()>("Even", |value, _| {
//!     value.as_i64().is_some_and(|v| v % 2 == 0)
//! }));
//! ```
//!
//! # Tag grammar
//!
//! Invocations are separated by `;`. Each is `Name` or `Name(p1, p2, ...)`.
//! String parameters are single-quoted, numbers are bare. Whitespace outside
//! quotes is ignored. The keyword parameters `include=`, `exclude=` and
//! `message=` modify an invocation instead of being passed to the rule.
//! Rules whose name is not registered are skipped.
//!
//! # Error types
//!
//! | Type | When |
//! |------|------|
//! | [`ValidationError`] | One or more fields failed their rules |
//! | [`UsageError`] | The candidate is not a record |
//! | [`ParameterMismatchError`] | A rule was declared with the wrong number of parameters |
//! | [`CoercionError`] | A parameter could not be converted (strict mode only) |
//!
//! All four are unified under [`Error`].

#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod validator;
mod value;
mod violation;

pub use config::{ValidationOption, ValidatorOption};
pub use error::{
    CoercionError, Error, ParameterMismatchError, UsageError, ValidationError,
};
pub use record::{
    DynamicRecord, FieldDescriptor, FieldType, RecordDescriptor, RecordType, ReflectRecord,
};
pub use validator::{
    BoundParams, Coercion, FieldRule, Modifiers, ParamField, ParamKind, ParamValue, Params,
    Predicate, Registry, RuleInvocation, Validator, ValidatorDescriptor, parse_tag,
    register_record, register_validator, validate,
};
pub use value::{Kind, Value};
pub use violation::Violation;

#[doc(hidden)]
pub use record::field_descriptor as __field_descriptor;

use std::sync::{Arc, LazyLock};

use crate::config::{ValidationConfig, ValidationOption, ValidatorOption};
use crate::error::{Error, UsageError};
use crate::record::{RecordDescriptor, RecordType, ReflectRecord};
use crate::value::Value;
use crate::violation::Violation;

mod binder;
mod builder;
mod evaluator;
mod registry;
mod resolve;
mod rules;
mod tag;

pub use binder::{BoundParams, Coercion, ParamField, ParamKind, ParamValue, Params};
pub use registry::{Predicate, Registry, ValidatorDescriptor};
pub use resolve::FieldRule;
pub use tag::{Modifiers, RuleInvocation, parse_tag};

use builder::Builder;

/// Thread-safe validator for tagged records.
///
/// Rules are resolved lazily per record type and cached for reuse. Field
/// values are re-read on every call.
pub struct Validator {
    registry: Arc<Registry>,
    builder: Builder,
    config: ValidationConfig,
}

impl Validator {
    /// Create a new `Validator` with the built-in rules and default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::with_builtins()),
            builder: Builder::new(),
            config: ValidationConfig::default(),
        }
    }

    /// Create a new `Validator` with the given options.
    #[must_use]
    pub fn with_options(options: &[ValidatorOption]) -> Self {
        let mut config = ValidationConfig::default();
        let mut registry = None;
        let mut records = Vec::new();

        for opt in options {
            match opt {
                ValidatorOption::FailFast => config.fail_fast = true,
                ValidatorOption::Coercion(coercion) => config.coercion = *coercion,
                ValidatorOption::Registry(shared) => registry = Some(Arc::clone(shared)),
                ValidatorOption::Records(descriptors) => {
                    records.extend(descriptors.iter().cloned());
                }
            }
        }

        let validator = Self {
            registry: registry.unwrap_or_else(|| Arc::new(Registry::with_builtins())),
            builder: Builder::new(),
            config,
        };
        for descriptor in &records {
            validator.preload(descriptor);
        }
        validator
    }

    /// The registry this validator resolves rules against.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Register a validator, replacing any existing one with the same name.
    ///
    /// Record types whose rules were already cached keep the rules they
    /// resolved; a newly registered name only applies to types resolved later.
    pub fn register_validator(&self, descriptor: ValidatorDescriptor) {
        self.registry.register(descriptor);
    }

    /// Resolve and cache the rules for `R` ahead of its first validation.
    pub fn register_record<R: RecordType>(&self) {
        self.preload(&R::record_descriptor());
    }

    /// Resolve and cache the rules for a record shape.
    pub fn preload(&self, descriptor: &RecordDescriptor) {
        self.builder.preload(descriptor, &self.registry);
    }

    /// Returns true if rules for this record shape are cached.
    #[must_use]
    pub fn is_cached(&self, descriptor: &RecordDescriptor) -> bool {
        self.builder.contains(descriptor.full_name())
    }

    /// The resolved rules for a record shape, in evaluation order.
    ///
    /// Uses the cached rules when present. An uncached shape is resolved
    /// against the current registry and left uncached.
    #[must_use]
    pub fn field_rules(&self, descriptor: &RecordDescriptor) -> Vec<FieldRule> {
        match self.builder.get(descriptor.full_name()) {
            Some(eval) => eval.rules().cloned().collect(),
            None => resolve::resolve_rules(descriptor, &self.registry),
        }
    }

    /// Validate a record against its tagged rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying every failing field, or
    /// [`Error::ParameterMismatch`] / [`Error::Coercion`] when a rule
    /// declaration cannot be bound.
    pub fn validate<R: ReflectRecord + ?Sized>(&self, record: &R) -> Result<(), Error> {
        self.validate_with(record, &[])
    }

    /// Validate a record with per-call validation options.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate`].
    pub fn validate_with<R: ReflectRecord + ?Sized>(
        &self,
        record: &R,
        options: &[ValidationOption],
    ) -> Result<(), Error> {
        let descriptor = record.descriptor();
        let eval = self.builder.load_or_build(&descriptor, &self.registry);
        if eval.tautology() {
            return Ok(());
        }
        let cfg = self.config.with_options(options);
        eval.evaluate(&DynRecord(record), &self.registry, &cfg)
    }

    /// Validate a record and return the failures as a list.
    ///
    /// An empty list means the record passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterMismatch`] / [`Error::Coercion`] when a
    /// rule declaration cannot be bound. Rule failures are never returned as
    /// `Err` from this method.
    pub fn violations<R: ReflectRecord + ?Sized>(&self, record: &R) -> Result<Vec<Violation>, Error> {
        match self.validate(record) {
            Ok(()) => Ok(Vec::new()),
            Err(Error::Validation(err)) => Ok(err.violations),
            Err(other) => Err(other),
        }
    }

    /// Validate a dynamically typed candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] if the candidate is not a record (opaque
    /// slots are unwrapped first), otherwise the same as
    /// [`Validator::validate`].
    pub fn validate_value(&self, candidate: &Value) -> Result<(), Error> {
        match candidate.as_record() {
            Some(record) => self.validate(record),
            None => Err(UsageError {
                cause: "candidate must be of type struct".to_string(),
            }
            .into()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Erases `?Sized` record types so evaluators can take `&dyn ReflectRecord`.
struct DynRecord<'a, R: ?Sized>(&'a R);

impl<R: ReflectRecord + ?Sized> ReflectRecord for DynRecord<'_, R> {
    fn descriptor(&self) -> RecordDescriptor {
        self.0.descriptor()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.0.get_field(name)
    }
}

static GLOBAL_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// Validate a record using a global `Validator` instance.
///
/// This is a convenience function that uses a shared, lazily-initialized
/// validator with the built-in rules. Applications that need isolated rule
/// sets should own a [`Validator`] instead.
///
/// # Errors
///
/// Same as [`Validator::validate`].
pub fn validate<R: ReflectRecord + ?Sized>(record: &R) -> Result<(), Error> {
    GLOBAL_VALIDATOR.validate(record)
}

/// Register a validator with the global `Validator`.
pub fn register_validator(descriptor: ValidatorDescriptor) {
    GLOBAL_VALIDATOR.register_validator(descriptor);
}

/// Prime the global `Validator`'s rule cache for `R`.
pub fn register_record<R: RecordType>() {
    GLOBAL_VALIDATOR.register_record::<R>();
}

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::value::Value;

use super::binder::{BoundParams, ParamField, Params};
use super::rules;

/// Predicate signature shared by every registered validator.
pub type Predicate = dyn Fn(&Value, &BoundParams) -> bool + Send + Sync;

/// A named validator: its predicate and the parameters it expects.
///
/// Immutable once built. The registry hands out shared references, so
/// per-call parameters are never stored here.
pub struct ValidatorDescriptor {
    name: String,
    params: Vec<ParamField>,
    predicate: Arc<Predicate>,
}

impl ValidatorDescriptor {
    /// Create a descriptor from an untyped predicate.
    pub fn new<F>(name: impl Into<String>, params: impl Into<Vec<ParamField>>, predicate: F) -> Self
    where
        F: Fn(&Value, &BoundParams) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Create a descriptor whose predicate receives a typed parameter record.
    ///
    /// ```rust
    /// use tagvalid::{ValidatorDescriptor, Value};
    ///
    /// let even = ValidatorDescriptor::typed::<()>("Even", |value, _params| {
    ///     value.as_i64().is_some_and(|v| v % 2 == 0)
    /// });
    /// assert_eq!(even.name(), "Even");
    /// assert!(even.params().is_empty());
    /// ```
    pub fn typed<P: Params + 'static>(
        name: impl Into<String>,
        predicate: impl Fn(&Value, &P) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, P::SHAPE, move |value: &Value, bound: &BoundParams| {
            predicate(value, &P::from_bound(bound))
        })
    }

    /// The rule name this validator is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameter fields.
    #[must_use]
    pub fn params(&self) -> &[ParamField] {
        &self.params
    }

    /// Run the predicate.
    #[must_use]
    pub fn check(&self, value: &Value, params: &BoundParams) -> bool {
        (self.predicate)(value, params)
    }
}

impl fmt::Debug for ValidatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Thread-safe mapping from rule name to validator.
///
/// Registering under an existing name replaces the previous entry.
#[derive(Default)]
pub struct Registry {
    validators: RwLock<HashMap<String, Arc<ValidatorDescriptor>>>,
}

impl Registry {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<ValidatorDescriptor>>> {
        self.validators
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<ValidatorDescriptor>>> {
        self.validators
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in validators:
    /// `NotEmpty`, `Min`, `Range`, `Contains` and `Email`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for descriptor in rules::builtins() {
            registry.register(descriptor);
        }
        registry
    }

    /// Add a validator, replacing any existing one with the same name.
    pub fn register(&self, descriptor: ValidatorDescriptor) {
        let name = descriptor.name.clone();
        let previous = self.write().insert(name, Arc::new(descriptor));
        if let Some(previous) = previous {
            tracing::debug!(rule = previous.name(), "replaced registered validator");
        }
    }

    /// Look up a validator by rule name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<ValidatorDescriptor>> {
        self.read().get(name).map(Arc::clone)
    }

    /// Returns true if a validator is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// All registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("validators", &self.names())
            .finish()
    }
}

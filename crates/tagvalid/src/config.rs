use std::sync::Arc;

use crate::record::RecordDescriptor;
use crate::validator::{Coercion, Registry};

/// Options for configuring the `Validator` at construction time.
#[non_exhaustive]
pub enum ValidatorOption {
    /// Stop validation on the first violation instead of collecting all.
    FailFast,

    /// How raw parameters that fail to parse are handled.
    Coercion(Coercion),

    /// Use this registry instead of a fresh one with the built-in validators.
    /// Lets several validators share one set of registered rules.
    Registry(Arc<Registry>),

    /// Resolve and cache the rules for these record types at construction
    /// time instead of on first use.
    Records(Vec<RecordDescriptor>),
}

/// Options for configuring a single `Validator::validate_with` call.
#[non_exhaustive]
pub enum ValidationOption {
    /// Stop validation on the first violation instead of collecting all.
    FailFast,
    /// Override the coercion mode for this call.
    Coercion(Coercion),
}

/// Runtime configuration passed to evaluators during validation.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ValidationConfig {
    pub fail_fast: bool,
    pub coercion: Coercion,
}

impl ValidationConfig {
    pub(crate) fn with_options(self, options: &[ValidationOption]) -> Self {
        let mut cfg = self;
        for option in options {
            match option {
                ValidationOption::FailFast => cfg.fail_fast = true,
                ValidationOption::Coercion(coercion) => cfg.coercion = *coercion,
            }
        }
        cfg
    }
}

use std::fmt;

use crate::validator::ParamKind;
use crate::violation::Violation;

/// Top-level error type returned by validation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more fields failed their rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The candidate passed to the validator is not a record.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A rule was declared with the wrong number of parameters.
    #[error(transparent)]
    ParameterMismatch(#[from] ParameterMismatchError),

    /// A parameter could not be converted to its declared type (strict mode).
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl Error {
    /// The rule violations carried by this error, if it is a validation error.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(err) => Some(&err.violations),
            _ => None,
        }
    }
}

/// Returned when one or more fields fail their declared rules.
#[derive(Debug)]
pub struct ValidationError {
    /// Every failure found, in field and rule declaration order.
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.len() {
            0 => Ok(()),
            1 => write!(f, "{}", self.violations[0]),
            _ => {
                write!(f, "validation errors:")?;
                for v in &self.violations {
                    write!(f, "\n - {v}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub(crate) fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Render the violations as a JSON array of
    /// `{field, rule, value, message}` objects.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.violations.iter().map(Violation::to_json).collect())
    }
}

/// Returned when the candidate is not a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tagvalid: {cause}")]
pub struct UsageError {
    /// Why the candidate was rejected.
    pub cause: String,
}

/// Returned when a rule invocation supplies a different number of parameters
/// than its validator declares.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "tagvalid: validator '{rule}' on field '{field}' has a parameter mismatch. Providing {provided}, require {required}"
)]
pub struct ParameterMismatchError {
    /// Field carrying the invocation.
    pub field: String,
    /// Rule name.
    pub rule: String,
    /// Number of positional parameters in the tag.
    pub provided: usize,
    /// Number of parameters the validator declares.
    pub required: usize,
}

/// Returned in strict coercion mode when a raw parameter cannot be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tagvalid: validator '{rule}' on field '{field}' cannot read parameter '{param}' from {raw:?} as {kind}")]
pub struct CoercionError {
    /// Field carrying the invocation.
    pub field: String,
    /// Rule name.
    pub rule: String,
    /// Declared parameter name.
    pub param: String,
    /// The raw token from the tag.
    pub raw: String,
    /// The declared parameter type.
    pub kind: ParamKind,
}

/// Merge violations from one rule evaluation into an accumulator.
///
/// Returns `(should_continue, accumulated_error)`.
/// Non-validation errors always stop; with `fail_fast` the first violation does too.
pub(crate) fn merge_violations(
    acc: Option<Error>,
    new_err: Result<(), Error>,
    fail_fast: bool,
) -> (bool, Option<Error>) {
    let new_err = match new_err {
        Ok(()) => return (true, acc),
        Err(e) => e,
    };

    match new_err {
        Error::Validation(new_val) => {
            if fail_fast {
                return (false, Some(Error::Validation(new_val)));
            }
            match acc {
                Some(Error::Validation(mut existing)) => {
                    existing.violations.extend(new_val.violations);
                    (true, Some(Error::Validation(existing)))
                }
                _ => (true, Some(Error::Validation(new_val))),
            }
        }
        other => (false, Some(other)),
    }
}

//! Validation error type.

use thiserror::Error;

use super::action::{Action, EntityKind};
use super::failure::ValidationFailureDetails;

/// Result type for validation entry points
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The single aggregated error a validation pass surfaces.
///
/// `message` joins every failure in collection order. It is empty when the
/// rule-check reported invalid without recording anything.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    kind: EntityKind,
    action: Action,
    message: String,
    failures: Vec<ValidationFailureDetails>,
}

impl ValidationError {
    pub fn new(
        kind: EntityKind,
        action: Action,
        message: impl Into<String>,
        failures: Vec<ValidationFailureDetails>,
    ) -> Self {
        Self {
            kind,
            action,
            message: message.into(),
            failures,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn failures(&self) -> &[ValidationFailureDetails] {
        &self.failures
    }

    /// True if any failure is a programming defect rather than bad input
    pub fn is_internal(&self) -> bool {
        self.failures.iter().any(|f| f.is_internal_error())
    }
}

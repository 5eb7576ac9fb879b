//! Error types shared across GoodWatch crates

use thiserror::Error;

/// Errors raised by GoodWatch components.
///
/// "Nothing to recommend" is not an error: the engine models it as a
/// `StopCondition`. These variants cover configuration, malformed input,
/// failing collaborators and broken engine invariants.
#[derive(Debug, Error)]
pub enum GoodWatchError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// Input data failed validation
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    /// An external collaborator (catalog, history store, ...) failed
    #[error("{collaborator} failed: {message}")]
    CollaboratorError {
        collaborator: String,
        message: String,
    },

    /// The engine produced an item that fails its own validity predicate
    #[error("Invariant violation for item {item_id}: {reason}")]
    InvariantViolation { item_id: String, reason: String },
}

impl GoodWatchError {
    /// Build a validation error tied to a specific field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Build a configuration error tied to an environment key
    pub fn configuration(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a collaborator failure
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorError {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => "configuration_error",
            Self::ValidationError { .. } => "validation_error",
            Self::CollaboratorError { .. } => "collaborator_error",
            Self::InvariantViolation { .. } => "invariant_violation",
        }
    }
}

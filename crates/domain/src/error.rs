//! Domain error kinds.

use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by the rule engines and application services.
///
/// Transport-agnostic; the HTTP layer maps each kind onto a status code.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input. Only the first offending field is reported.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation would duplicate state that must be unique.
    #[error("{0}")]
    Conflict(String),

    /// A business rule blocks the action.
    #[error("{0}")]
    Policy(String),

    /// The actor is not allowed to perform the action.
    #[error("{0}")]
    Forbidden(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wraps a field validator failure.
    pub fn from_field(field: impl Into<String>, err: validator::ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        DomainError::validation(field, message)
    }
}

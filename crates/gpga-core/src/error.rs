//! Error types for GPGA Core

use thiserror::Error;

/// Result type alias using GPGA's core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing metadata field: ::{0}")]
    MissingField(String),

    #[error("Malformed metadata field ::{field}: {reason}")]
    MalformedField { field: String, reason: String },

    #[error("Incomplete graph: {0}")]
    IncompleteGraph(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Ancestor search from {start} exceeded {limit} iterations")]
    SearchLimitExceeded { start: String, limit: usize },
}

impl Error {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

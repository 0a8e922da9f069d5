//! Domain-level errors

use thiserror::Error;

/// Errors that can occur while building or parsing domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A coordinate axis is missing, not finite, or out of range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A routing mode string could not be parsed
    #[error("Invalid routing mode: {0}")]
    InvalidRoutingMode(String),
}

impl DomainError {
    /// Create an invalid coordinate error
    pub fn invalid_coordinate(detail: impl Into<String>) -> Self {
        Self::InvalidCoordinate(detail.into())
    }
}

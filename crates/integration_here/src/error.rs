//! HERE client error types

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during a HERE operation
///
/// Argument and response-shape failures are reported with their own variants;
/// transport and JSON failures are passed through unchanged.
#[derive(Debug, Error)]
pub enum HereError {
    /// A required argument was absent or empty
    #[error("Required argument missing data: {0}")]
    MissingArgument(String),

    /// A sequence argument had fewer elements than required
    #[error("Argument missing data ({required} required, {actual} passed): {name}")]
    InsufficientArguments {
        /// Argument name
        name: String,
        /// Minimum number of elements
        required: usize,
        /// Number of elements passed
        actual: usize,
    },

    /// A coordinate was missing an axis or was not numeric
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A departure time could not be interpreted
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A stop label contained a character reserved by the wire format
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// A routing mode string could not be parsed
    #[error("Invalid routing mode: {0}")]
    InvalidMode(String),

    /// The response body carried none of the known envelopes
    #[error("No response")]
    NoResponse,

    /// The geocoder returned no location for the address
    #[error("Geocoding failed: no location returned")]
    GeocodeFailed,

    /// The geocoder returned a location without address details
    #[error("Geocoding incomplete: no address returned")]
    GeocodeIncomplete,

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport failure, including non-success statuses
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON or not the expected shape
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HereError {
    /// Create a missing argument error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument(name.into())
    }

    /// Returns true if the error was raised before any request was sent
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_)
                | Self::InsufficientArguments { .. }
                | Self::InvalidCoordinate(_)
                | Self::InvalidDate(_)
                | Self::InvalidMode(_)
                | Self::InvalidLabel(_)
        )
    }
}

impl From<DomainError> for HereError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCoordinate(detail) => Self::InvalidCoordinate(detail),
            DomainError::InvalidRoutingMode(mode) => Self::InvalidMode(mode),
        }
    }
}

//! Error types for analytics queries.
//!
//! The core never knows about transport status codes; the HTTP layer maps
//! these variants onto responses in [`crate::server`].

use thiserror::Error;

/// Errors an analytics query can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// An entity, or the peer/history context a query needs, is absent.
    #[error("{0}")]
    NotFound(String),

    /// An identifier could not be parsed as the expected integer type.
    #[error("{0}")]
    InvalidArgument(String),

    /// Not enough data to compute a statistic. Facade queries turn this into
    /// an empty or default result instead of returning it.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl AnalyticsError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Parses an integer identifier arriving as text.
///
/// Malformed input is rejected rather than coerced to zero.
pub fn parse_id(raw: &str, name: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AnalyticsError::invalid_argument(format!("{name} must be an integer")))
}

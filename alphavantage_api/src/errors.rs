//! Error types for the API client.

/// Errors that can occur when looking up a symbol.
///
/// Every recognised failure of a lookup ends up in one of these three
/// kinds. None of them is fatal to the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport-level failure: timeout, connection reset, malformed HTTP,
    /// or a non-success status.
    #[error("Network error: {0}")]
    Network(String),
    /// The response body is not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The body is valid JSON but carries no time series entries
    /// (unknown symbol, quota message, missing credential).
    #[error("No time series data found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether a caller-side retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

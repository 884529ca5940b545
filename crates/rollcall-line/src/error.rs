//! Error types for LINE Messaging API operations.

use thiserror::Error;

/// Result type alias for LINE operations.
pub type Result<T> = std::result::Result<T, LineError>;

/// Error conditions for LINE API access.
///
/// Every send is best-effort from the caller's point of view: errors are
/// logged at the call site and never fail the surrounding HTTP response.
#[derive(Debug, Error)]
pub enum LineError {
    /// No channel access token is configured.
    #[error("channel access token not configured")]
    MissingCredentials,

    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Number of seconds before the request timed out
        timeout_seconds: u64,
    },

    /// The API returned a non-success status.
    #[error("LINE API error: HTTP {status}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body content
        body: String,
    },
}

impl LineError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates an API status error.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api { status, body: body.into() }
    }
}

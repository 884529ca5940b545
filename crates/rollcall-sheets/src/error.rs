//! Error types for Sheets API operations.
//!
//! Categorizes failures into network, timeout, API status, credential,
//! and response-shape errors. There is no retry taxonomy: every call is
//! attempted at most once and any failure surfaces to the handler's
//! top-level error mapping.

use thiserror::Error;

/// Result type alias for Sheets operations.
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Error conditions for Sheets API access.
#[derive(Debug, Error)]
pub enum SheetsError {
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
    #[error("sheets API error: HTTP {status}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body content (truncated)
        body: String,
    },

    /// Service account credentials missing or unusable.
    #[error("credential error: {message}")]
    Credentials {
        /// What went wrong loading or using the key
        message: String,
    },

    /// OAuth2 token exchange failed.
    #[error("token exchange failed: {message}")]
    TokenExchange {
        /// Token endpoint failure detail
        message: String,
    },

    /// The API responded with an unexpected shape.
    #[error("unexpected response shape: {message}")]
    Decode {
        /// What failed to decode
        message: String,
    },
}

impl SheetsError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates an API status error, truncating oversized bodies.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        const MAX_BODY: usize = 1024;
        let mut body = body.into();
        if body.len() > MAX_BODY {
            let mut cut = MAX_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("... (truncated)");
        }
        Self::Api { status, body }
    }

    /// Creates a credential error.
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials { message: message.into() }
    }

    /// Creates a token exchange error.
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange { message: message.into() }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_truncates_long_bodies() {
        let error = SheetsError::api(500, "x".repeat(5000));
        match error {
            SheetsError::Api { status, body } => {
                assert_eq!(status, 500);
                assert!(body.len() < 2000);
                assert!(body.ends_with("... (truncated)"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_display_format() {
        assert_eq!(SheetsError::timeout(10).to_string(), "request timeout after 10s");
        assert_eq!(
            SheetsError::api(404, "not found").to_string(),
            "sheets API error: HTTP 404"
        );
    }
}

//! Error types for the data automation client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the data automation client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if repeating the same request may succeed
    ///
    /// Connection failures, timeouts, throttling (429) and 5xx responses are
    /// transient. Malformed responses and other 4xx responses are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(e) => !e.is_decode() && !e.is_builder(),
            Self::ApiError { status: 429, .. } => true,
            Self::ApiError { .. } => self.is_server_error(),
            Self::ParseError(_) | Self::InvalidRequest(_) => false,
        }
    }
}

impl From<bda_core::CoreError> for ClientError {
    fn from(err: bda_core::CoreError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

//! Generation errors

use thiserror::Error;

/// Errors that can occur while generating a line
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Client is misconfigured (e.g., live mode without an API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request never produced a response (connection, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Response body is not a chat completion
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Completion carried no usable text
    #[error("Response contained no generated text")]
    EmptyResponse,
}

impl GenerationError {
    /// HTTP status, when the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;

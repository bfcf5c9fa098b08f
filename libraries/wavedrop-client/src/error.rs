//! Error types for the Wavedrop backend client.

use thiserror::Error;
use wavedrop_core::WavedropError;

/// Errors that can occur when talking to the Wavedrop backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Authentication required but no session available
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Collapse transport-level failures into the core taxonomy.
impl From<ClientError> for WavedropError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired => Self::AuthRequired,
            other => Self::Network(other.to_string()),
        }
    }
}

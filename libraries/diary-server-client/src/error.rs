//! Error types for the Diary server client.

use thiserror::Error;

/// Errors that can occur when talking to the Diary backend.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;

impl From<ServerClientError> for diary_core::DiaryError {
    fn from(err: ServerClientError) -> Self {
        match &err {
            ServerClientError::ServerUnreachable(_) => diary_core::DiaryError::network(err.to_string()),
            ServerClientError::Request(e) if e.is_connect() || e.is_timeout() => {
                diary_core::DiaryError::network(err.to_string())
            }
            ServerClientError::InvalidUrl(_) => diary_core::DiaryError::invalid_input(err.to_string()),
            _ => diary_core::DiaryError::lookup(err.to_string()),
        }
    }
}

/// Core error types for the Diary client
use thiserror::Error;

/// Result type alias using `DiaryError`
pub type Result<T> = std::result::Result<T, DiaryError>;

/// Core error type for the Diary client
#[derive(Error, Debug)]
pub enum DiaryError {
    /// Durable storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The remote lookup service rejected or failed the request
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Network error (unreachable server, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DiaryError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

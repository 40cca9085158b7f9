//! Error types for blog core operations.
//!
//! Errors are descriptive at the core level; the server maps these to HTTP
//! status codes and client-facing messages.

use thiserror::Error;

/// Result type alias for blog operations.
pub type Result<T> = std::result::Result<T, BlogError>;

/// Core error type for blog operations.
#[derive(Debug, Error)]
pub enum BlogError {
    /// Malformed argument to a credential routine (null, wrong type, out of range)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Document field validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Random source or MAC construction failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Store file does not exist
    #[error("Store not found")]
    StoreNotFound,

    /// Unique key already taken (article name, user email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl BlogError {
    /// True for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BlogError::InvalidArgument(_) | BlogError::Validation(_)
        )
    }
}

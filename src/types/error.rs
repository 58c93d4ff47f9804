//! Error types for Stowage

/// Main error type for Stowage operations
#[derive(Debug, thiserror::Error)]
pub enum StowageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Key-value store error: {0}")]
    KeyValue(String),

    #[error("Missing key: {0}")]
    MissingKey(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StowageError {
    /// True when the error came from one of the backing stores
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::KeyValue(_))
    }
}

// Implement From conversions for the store client errors

impl From<mongodb::error::Error> for StowageError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<redis::RedisError> for StowageError {
    fn from(err: redis::RedisError) -> Self {
        Self::KeyValue(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for StowageError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Decode(format!("invalid UTF-8: {}", err))
    }
}

/// Result type alias for Stowage operations
pub type Result<T> = std::result::Result<T, StowageError>;

//! Storage error types

use thiserror::Error;

/// Session storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Session file is corrupt: {0}")]
    Corrupt(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

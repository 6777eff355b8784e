//! Error types for the storage layer

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage connection error: {0}")]
    ConnectionError(String),

    #[error("Storage migration error: {0}")]
    MigrationError(String),

    #[error("Storage query error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

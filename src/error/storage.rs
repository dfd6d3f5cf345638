//! Storage and persistence error types.

use thiserror::Error;

/// Errors raised by key-value stores and thread persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store cannot be used (no data directory, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

//! Store error types.

use thiserror::Error;

/// Errors raised inside the store.
///
/// These never cross the [`RecordStore`](crate::RecordStore) boundary: the
/// record operations log them and degrade to an empty result or a no-op.
/// Backends and the readiness check do return them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is not valid JSON for its record type.
    #[error("corrupt stored value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// The write would exceed the backend's size limit.
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded { limit: usize },

    /// A lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,

    /// Hashing a password failed.
    #[error("password hashing failed")]
    PasswordHash,
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

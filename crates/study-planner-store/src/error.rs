//! Error types for study planner store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a slot.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Slot key contains characters that cannot name a slot.
    #[error("Invalid slot key: {0:?}")]
    InvalidKey(String),

    /// Write rejected because it exceeds the slot quota.
    #[error("Quota exceeded writing {key}: {bytes} bytes > {quota} bytes")]
    QuotaExceeded {
        /// Target slot key.
        key: String,
        /// Size of the rejected write.
        bytes: usize,
        /// Configured limit.
        quota: usize,
    },

    /// Failed to serialize the envelope to JSON.
    #[error("Failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to acquire the in-memory slot lock.
    #[error("Slot lock error")]
    LockError,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

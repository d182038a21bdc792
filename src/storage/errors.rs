//! Storage errors

use thiserror::Error;

use crate::value::ValueKind;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The value cannot be used as a primary or index key
    #[error("value of kind {kind} cannot be used as a key: {reason}")]
    InvalidKey {
        kind: ValueKind,
        reason: &'static str,
    },

    /// Stored bytes failed checksum or framing validation
    #[error("corrupted record in bucket '{bucket}': {reason}")]
    Corruption { bucket: String, reason: String },

    /// A record could not be serialized
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored bytes passed the checksum but do not decode as the record type
    #[error("failed to decode record: {0}")]
    Decode(#[source] serde_json::Error),

    /// A write was attempted on a read-only transaction
    #[error("transaction is read-only")]
    ReadOnly,

    /// A lock guarding committed state was poisoned by a panicking writer
    #[error("storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub(crate) fn invalid_key(kind: ValueKind, reason: &'static str) -> Self {
        StorageError::InvalidKey { kind, reason }
    }

    pub(crate) fn corruption(bucket: impl Into<String>, reason: impl Into<String>) -> Self {
        StorageError::Corruption {
            bucket: bucket.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if stored data failed validation
    pub fn is_corruption(&self) -> bool {
        matches!(self, StorageError::Corruption { .. })
    }
}

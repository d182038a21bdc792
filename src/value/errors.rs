//! Comparator errors

use thiserror::Error;

use super::ValueKind;

/// Result type for comparator operations
pub type CompareResult<T> = Result<T, CompareError>;

/// Comparator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The two values cannot be related under the requested comparison
    #[error("cannot compare {left} with {right} for {intent}")]
    TypeMismatch {
        intent: &'static str,
        left: ValueKind,
        right: ValueKind,
    },
}

impl CompareError {
    pub(crate) fn mismatch(intent: &'static str, left: ValueKind, right: ValueKind) -> Self {
        CompareError::TypeMismatch {
            intent,
            left,
            right,
        }
    }
}

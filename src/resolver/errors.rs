//! Resolver errors

use thiserror::Error;

/// Result type for path compilation and resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path does not name a field of the shape, or crosses a nil pointer
    #[error("field '{path}' not found on {shape}: {reason}")]
    FieldNotFound {
        path: String,
        shape: &'static str,
        reason: String,
    },

    /// The path ends on a composite that has no scalar value
    #[error("field '{path}' on {shape} is a composite and cannot be compared")]
    NotComparable { path: String, shape: &'static str },

    /// A compiled path was applied to a value of another type
    #[error("path '{path}' was compiled for {expected}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
    },
}

impl ResolveError {
    pub(crate) fn not_found(
        path: impl Into<String>,
        shape: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        ResolveError::FieldNotFound {
            path: path.into(),
            shape,
            reason: reason.into(),
        }
    }

    /// Path the error refers to
    pub fn path(&self) -> &str {
        match self {
            ResolveError::FieldNotFound { path, .. }
            | ResolveError::NotComparable { path, .. }
            | ResolveError::ShapeMismatch { path, .. } => path,
        }
    }
}

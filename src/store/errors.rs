//! Store error types
//!
//! Error codes:
//! - HOLD_FIELD_NOT_FOUND (ERROR)
//! - HOLD_TYPE_MISMATCH (ERROR)
//! - HOLD_MUTATION_FAILED (ERROR)
//! - HOLD_MATCH_FUNC_FAILED (ERROR)
//! - HOLD_KEY_EXISTS (ERROR)
//! - HOLD_KEY_NOT_FOUND (ERROR)
//! - HOLD_INVALID_KEY (ERROR)
//! - HOLD_STORAGE_FAILED (ERROR)
//! - HOLD_DATA_CORRUPTION (FATAL)
//! - HOLD_CONFIG_INVALID (ERROR)

use std::error::Error as StdError;
use std::fmt;

use crate::observability::Severity;
use crate::query::BoxError;
use crate::resolver::ResolveError;
use crate::storage::{StorageError, StoreKey};
use crate::value::CompareError;

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Path does not resolve on the record shape, or ends on a composite
    HoldFieldNotFound,
    /// Operands of incompatible kinds
    HoldTypeMismatch,
    /// Mutation callback reported failure
    HoldMutationFailed,
    /// Caller match function reported failure
    HoldMatchFuncFailed,
    HoldKeyExists,
    HoldKeyNotFound,
    /// Value cannot be used as a key
    HoldInvalidKey,
    /// Storage engine failure
    HoldStorageFailed,
    /// Stored bytes failed validation (FATAL)
    HoldDataCorruption,
    HoldConfigInvalid,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::HoldFieldNotFound => "HOLD_FIELD_NOT_FOUND",
            StoreErrorCode::HoldTypeMismatch => "HOLD_TYPE_MISMATCH",
            StoreErrorCode::HoldMutationFailed => "HOLD_MUTATION_FAILED",
            StoreErrorCode::HoldMatchFuncFailed => "HOLD_MATCH_FUNC_FAILED",
            StoreErrorCode::HoldKeyExists => "HOLD_KEY_EXISTS",
            StoreErrorCode::HoldKeyNotFound => "HOLD_KEY_NOT_FOUND",
            StoreErrorCode::HoldInvalidKey => "HOLD_INVALID_KEY",
            StoreErrorCode::HoldStorageFailed => "HOLD_STORAGE_FAILED",
            StoreErrorCode::HoldDataCorruption => "HOLD_DATA_CORRUPTION",
            StoreErrorCode::HoldConfigInvalid => "HOLD_CONFIG_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::HoldDataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    /// Field path the error refers to
    field: Option<String>,
    source: Option<BoxError>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub(crate) fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Comparison between incompatible kinds on `field`
    pub fn type_mismatch(field: impl Into<String>, source: CompareError) -> Self {
        let field = field.into();
        Self::new(
            StoreErrorCode::HoldTypeMismatch,
            format!("field '{}': {}", field, source),
        )
        .with_field(field)
        .with_source(source)
    }

    /// The mutation callback failed; the transaction was rolled back
    pub fn mutation_failed(key: &StoreKey, source: BoxError) -> Self {
        Self::new(
            StoreErrorCode::HoldMutationFailed,
            format!("mutation of record {} failed: {}", key, source),
        )
        .with_source(source)
    }

    /// A caller match function failed on `field`
    pub fn match_func_failed(field: impl Into<String>, source: BoxError) -> Self {
        let field = field.into();
        Self::new(
            StoreErrorCode::HoldMatchFuncFailed,
            format!("match function on '{}' failed: {}", field, source),
        )
        .with_field(field)
        .with_source(source)
    }

    pub fn key_exists(bucket: &str, key: &StoreKey) -> Self {
        Self::new(
            StoreErrorCode::HoldKeyExists,
            format!("{} already holds a record under {}", bucket, key),
        )
    }

    pub fn key_not_found(bucket: &str, key: &StoreKey) -> Self {
        Self::new(
            StoreErrorCode::HoldKeyNotFound,
            format!("{} has no record under {}", bucket, key),
        )
    }

    /// Configuration could not be loaded or parsed
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::HoldConfigInvalid, reason)
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ResolveError> for StoreError {
    fn from(err: ResolveError) -> Self {
        let path = err.path().to_string();
        Self::new(StoreErrorCode::HoldFieldNotFound, err.to_string())
            .with_field(path)
            .with_source(err)
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        let code = match &err {
            StorageError::Corruption { .. } => StoreErrorCode::HoldDataCorruption,
            StorageError::InvalidKey { .. } => StoreErrorCode::HoldInvalidKey,
            _ => StoreErrorCode::HoldStorageFailed,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

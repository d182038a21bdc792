//! Store configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{StoreError, StoreResult};

/// Store configuration, loadable from JSON.
///
/// Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Serve equality criteria on indexed fields from the index (default: true)
    #[serde(default = "default_use_indexes")]
    pub use_indexes: bool,

    /// Minimum severity written by the logger.
    ///
    /// The logger level is process-wide: when set, opening the store applies
    /// it to every store in the process. Unset (the default) leaves the
    /// current level alone.
    #[serde(default)]
    pub log_level: Option<Severity>,
}

fn default_use_indexes() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_indexes: default_use_indexes(),
            log_level: None,
        }
    }
}

impl StoreConfig {
    /// Parses configuration from a JSON document
    pub fn from_json_str(content: &str) -> StoreResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            StoreError::config_invalid(format!("invalid config JSON: {}", e)).with_source(e)
        })
    }

    /// Loads configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::config_invalid(format!(
                "failed to read config {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json_str(&content)
    }

    /// Disables the secondary index path
    pub fn without_indexes(mut self) -> Self {
        self.use_indexes = false;
        self
    }

    /// Sets the process-wide logger level applied when the store opens
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = Some(level);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorCode;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.use_indexes);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(StoreConfig::from_json_str("{}").unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_parse_fields() {
        let config =
            StoreConfig::from_json_str(r#"{"use_indexes": false, "log_level": "TRACE"}"#).unwrap();
        assert!(!config.use_indexes);
        assert_eq!(config.log_level, Some(Severity::Trace));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = StoreConfig::from_json_str(r#"{"use_index": true}"#).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::HoldConfigInvalid);
    }

    #[test]
    fn test_bad_level_rejected() {
        let err = StoreConfig::from_json_str(r#"{"log_level": "LOUD"}"#).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::HoldConfigInvalid);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "WARN"}}"#).unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, Some(Severity::Warn));
        assert!(config.use_indexes);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::HoldConfigInvalid);
    }
}

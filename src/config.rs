//! Backend Configuration
//!
//! Loaded from a JSON file. Only `table` is required:
//!
//! ```json
//! {
//!   "table": "people",
//!   "index_suffix": "-index",
//!   "scan_page_size": 100,
//!   "log_level": "info",
//!   "credentials": { "access_key_id": "...", "secret_access_key": "..." }
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid JSON for this schema
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but a value is out of range
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "DOCKV_CONFIG_IO",
            ConfigError::Parse(_) => "DOCKV_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "DOCKV_CONFIG_INVALID",
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Static credentials for the store session.
///
/// Carried through to whatever builds the store client; the backend itself
/// never reads them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Document backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backing table name
    pub table: String,

    /// Suffix appended to a field name to address its secondary index
    #[serde(default = "default_index_suffix")]
    pub index_suffix: String,

    /// Items per scan page; store default when unset
    #[serde(default)]
    pub scan_page_size: Option<usize>,

    /// Items per query page; store default when unset
    #[serde(default)]
    pub query_page_size: Option<usize>,

    /// Minimum log severity (trace, info, warn, error).
    ///
    /// The logger filter is process-wide: opening a backend applies this
    /// level to every backend in the process, and the last one opened wins.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional static credentials
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

fn default_index_suffix() -> String {
    "-index".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BackendConfig {
    /// Config for `table` with every other value defaulted
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            index_suffix: default_index_suffix(),
            scan_page_size: None,
            query_page_size: None,
            log_level: default_log_level(),
            credentials: None,
        }
    }

    pub fn with_scan_page_size(mut self, size: usize) -> Self {
        self.scan_page_size = Some(size);
        self
    }

    pub fn with_query_page_size(mut self, size: usize) -> Self {
        self.query_page_size = Some(size);
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;

        let shown = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", shown.as_str()), ("table", config.table.as_str())],
        );
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.table.trim().is_empty() {
            return Err(ConfigError::invalid("table", "must not be empty"));
        }
        if self.index_suffix.contains(':') {
            return Err(ConfigError::invalid(
                "index_suffix",
                "must not contain the filter delimiter ':'",
            ));
        }
        if self.scan_page_size == Some(0) {
            return Err(ConfigError::invalid("scan_page_size", "must be positive"));
        }
        if self.query_page_size == Some(0) {
            return Err(ConfigError::invalid("query_page_size", "must be positive"));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::invalid(
                "log_level",
                format!("unknown level '{}'", self.log_level),
            ));
        }
        Ok(())
    }

    /// Parsed log level. Falls back to INFO for unvalidated configs.
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Name of the secondary index addressing `field`
    pub fn index_name(&self, field: &str) -> String {
        format!("{}{}", field, self.index_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_json_str(r#"{"table": "people"}"#).unwrap();
        assert_eq!(config, BackendConfig::new("people"));
        assert_eq!(config.index_suffix, "-index");
        assert_eq!(config.log_severity(), Severity::Info);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_log_level_names() {
        let config = BackendConfig::from_json_str(r#"{"table": "t", "log_level": "Error"}"#).unwrap();
        assert_eq!(config.log_severity(), Severity::Error);

        let unvalidated = BackendConfig {
            log_level: "loud".into(),
            ..BackendConfig::new("t")
        };
        assert_eq!(unvalidated.log_severity(), Severity::Info);
    }

    #[test]
    fn test_index_name() {
        let config = BackendConfig::new("people");
        assert_eq!(config.index_name("email"), "email-index");
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let err = BackendConfig::from_json_str("{}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = BackendConfig::from_json_str(r#"{"table": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "table", .. }));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err =
            BackendConfig::from_json_str(r#"{"table": "t", "scan_page_size": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "scan_page_size",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err =
            BackendConfig::from_json_str(r#"{"table": "t", "log_level": "loud"}"#).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_rejects_delimiter_in_suffix() {
        let err =
            BackendConfig::from_json_str(r#"{"table": "t", "index_suffix": ":idx"}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "index_suffix",
                ..
            }
        ));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let config = BackendConfig::from_json_str(
            r#"{"table": "t", "credentials": {"access_key_id": "AKID", "secret_access_key": "s3cr3t"}}"#,
        )
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"table": "orders", "query_page_size": 25}}"#).unwrap();

        let config = BackendConfig::from_file(file.path()).unwrap();
        assert_eq!(config.table, "orders");
        assert_eq!(config.query_page_size, Some(25));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BackendConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(err.code(), "DOCKV_CONFIG_IO");
    }
}

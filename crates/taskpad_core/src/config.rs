//! Application configuration.
//!
//! # Responsibility
//! - Hold slot keys, import caps, export naming and log level.
//! - Load optional overrides from `taskpad.json` in the data directory.
//!
//! # Invariants
//! - A loaded config is always validated: non-empty distinct slot keys,
//!   positive caps, a supported log level.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "taskpad.json";
pub const DB_FILE_NAME: &str = "taskpad.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Character caps shared by create, edit and import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    pub title_max_chars: usize,
    pub body_max_chars: usize,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 200,
            body_max_chars: 4000,
        }
    }
}

impl RecordLimits {
    /// Trims `title` and keeps at most `title_max_chars` characters of it.
    pub fn clamp_title(&self, title: &str) -> String {
        cap_chars(title.trim(), self.title_max_chars)
            .trim_end()
            .to_string()
    }

    /// Keeps at most `body_max_chars` characters of `body`.
    pub fn clamp_body(&self, body: &str) -> String {
        cap_chars(body, self.body_max_chars)
    }
}

fn cap_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Runtime configuration. Every field may be omitted in `taskpad.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage_key: String,
    pub theme_key: String,
    pub title_max_chars: usize,
    pub body_max_chars: usize,
    pub export_file_name: String,
    /// Falls back to [`default_log_level`] when unset.
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let limits = RecordLimits::default();
        Self {
            storage_key: "taskpad.records.v1".to_string(),
            theme_key: "taskpad.theme".to_string(),
            title_max_chars: limits.title_max_chars,
            body_max_chars: limits.body_max_chars,
            export_file_name: "notes-tasks.json".to_string(),
            log_level: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

impl AppConfig {
    /// Loads `taskpad.json` from `data_dir`, or defaults when it is absent.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(CONFIG_FILE_NAME),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".into()));
        }
        if self.theme_key.trim().is_empty() {
            return Err(ConfigError::Invalid("theme_key cannot be empty".into()));
        }
        if self.storage_key.trim() == self.theme_key.trim() {
            return Err(ConfigError::Invalid(
                "storage_key and theme_key must differ".into(),
            ));
        }
        if self.title_max_chars == 0 || self.body_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "title_max_chars and body_max_chars must be positive".into(),
            ));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export_file_name cannot be empty".into(),
            ));
        }
        if let Some(level) = self.log_level.as_deref() {
            normalize_level(level).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    pub fn limits(&self) -> RecordLimits {
        RecordLimits {
            title_max_chars: self.title_max_chars,
            body_max_chars: self.body_max_chars,
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(data_dir: &Path) -> PathBuf {
        data_dir.join(LOG_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, RecordLimits, CONFIG_FILE_NAME};

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.limits().title_max_chars, 200);
        assert_eq!(config.limits().body_max_chars, 4000);
    }

    #[test]
    fn limits_clamp_by_characters() {
        let limits = RecordLimits {
            title_max_chars: 3,
            body_max_chars: 2,
        };
        assert_eq!(limits.clamp_title("  ab cd "), "ab");
        assert_eq!(limits.clamp_title("ééééé"), "ééé");
        assert_eq!(limits.clamp_body("xyz"), "xy");
        assert_eq!(limits.clamp_body(" x"), " x");
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config =
            AppConfig::from_json(r#"{"title_max_chars": 80, "log_level": "warn"}"#).unwrap();
        assert_eq!(config.title_max_chars, 80);
        assert_eq!(config.body_max_chars, 4000);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn rejects_same_key_for_records_and_theme() {
        let err = AppConfig::from_json(r#"{"storage_key": "k", "theme_key": "k"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = AppConfig::from_json(r#"{"log_level": "verbose"}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported log level"));
    }

    #[test]
    fn load_from_dir_reads_config_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            AppConfig::load_from_dir(dir.path()).unwrap(),
            AppConfig::default()
        );

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"export_file_name": "backup.json"}"#,
        )
        .unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.export_file_name, "backup.json");

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{not json").unwrap();
        let err = AppConfig::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with(CONFIG_FILE_NAME)));
    }
}

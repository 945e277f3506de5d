//! Console runtime configuration.
//!
//! # Responsibility
//! - Carry the backing file path and logging settings from the entry point
//!   into core.
//! - Reject unusable settings before any file is touched.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default backing file, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = "file.json";

/// Configuration validation error.
#[derive(Debug)]
pub enum ConfigError {
    EmptyStorePath,
    InvalidLogLevel(String),
    /// The working directory was needed to resolve a relative path.
    WorkingDirectory(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorePath => write!(f, "store path cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::WorkingDirectory(err) => {
                write!(f, "failed to read current working directory: {err}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDirectory(err) => Some(err),
            Self::EmptyStorePath | Self::InvalidLogLevel(_) => None,
        }
    }
}

/// Settings for one console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub store_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }
}

impl ConsoleConfig {
    /// Checks the settings without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }

    /// Returns the log directory as an absolute path, resolving a relative
    /// one against the current working directory.
    pub fn resolved_log_dir(&self) -> Result<PathBuf, ConfigError> {
        absolutize(&self.log_dir)
    }
}

/// `<system temp dir>/hbnb/logs`.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("hbnb").join("logs")
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ConsoleConfig, DEFAULT_STORE_FILE};
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_FILE));
        assert!(config.log_dir.is_absolute());
        config.validate().expect("defaults validate");
    }

    #[test]
    fn rejects_empty_store_path_and_bad_level() {
        let config = ConsoleConfig {
            store_path: PathBuf::new(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyStorePath)));

        let config = ConsoleConfig {
            log_level: "loud".into(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn relative_log_dir_resolves_against_cwd() {
        let config = ConsoleConfig {
            log_dir: PathBuf::from("logs"),
            ..ConsoleConfig::default()
        };
        let resolved = config.resolved_log_dir().expect("cwd available");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
    }
}

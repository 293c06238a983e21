//! Configuration management.
//!
//! Loads settings from a JSON file in the user's config directory. Missing
//! fields take their defaults, and a missing or broken file means defaults
//! across the board.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::LogLevel;

/// Directory name under the platform config/data directories.
pub const APP_DIR: &str = "simple-aac";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Delay before releasing the audio session after speech ends
    pub audio_session_grace_ms: u64,
    /// How long to wait for the engine to confirm a stop
    pub stop_timeout_ms: u64,
    /// Overrides the locale from the environment, e.g. "pt-BR"
    pub system_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            audio_session_grace_ms: 1000,
            stop_timeout_ms: 3000,
            system_locale: None,
        }
    }
}

impl Config {
    /// `<config dir>/simple-aac/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(config_path) = path.map(PathBuf::from).or_else(Self::default_path) else {
            info!("No config directory available, using defaults");
            return Self::default();
        };

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", config_path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn audio_session_grace(&self) -> Duration {
        Duration::from_millis(self.audio_session_grace_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Persist a new log level, keeping the rest of the file intact.
pub fn save_log_level(path: &Path, level: LogLevel) {
    let mut config = Config::load(Some(path));
    config.log_level = level;
    if let Err(e) = config.save(path) {
        warn!(error = %e, "Could not save log level");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join(CONFIG_FILE)));
        assert_eq!(config, Config::default());
        assert_eq!(config.audio_session_grace(), Duration::from_secs(1));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"log_level":"debug","system_locale":"he-IL"}"#).unwrap();

        let config = Config::load(Some(&path));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.system_locale.as_deref(), Some("he-IL"));
        assert_eq!(config.stop_timeout_ms, 3000);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "log_level = debug").unwrap();
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn log_level_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(APP_DIR).join(CONFIG_FILE);
        Config {
            stop_timeout_ms: 500,
            ..Config::default()
        }
        .save(&path)
        .unwrap();

        save_log_level(&path, LogLevel::Trace);

        let config = Config::load(Some(&path));
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.stop_timeout_ms, 500);
    }
}

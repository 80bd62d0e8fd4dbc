//! Configuration types for the codechat engine.
//!
//! Every field has a default, so a missing file or a partial JSON document
//! both yield a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding codechat files, relative to the working directory.
pub const CONFIG_DIR: &str = ".codechat";

/// Main configuration for codechat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Assistant message that opens every session.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Assistant message appended when the responder fails.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Lower bound of the simulated responder delay.
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,

    /// Upper bound of the simulated responder delay.
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,

    /// UI tick rate in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_greeting() -> String {
    "Hi! I'm your coding assistant. Ask me anything about programming, algorithms, \
     debugging, or software development!"
        .into()
}

fn default_fallback_message() -> String {
    "Sorry, I encountered an error processing your request. Please try again.".into()
}

fn default_latency_min_ms() -> u64 {
    1000
}

fn default_latency_max_ms() -> u64 {
    3000
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            fallback_message: default_fallback_message(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Default config file location under `base`.
    pub fn default_path(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency_min_ms > self.latency_max_ms {
            return Err(ConfigError::InvalidLatency {
                min: self.latency_min_ms,
                max: self.latency_max_ms,
            });
        }
        Ok(())
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Latency bounds are inverted.
    #[error("latency_min_ms ({min}) exceeds latency_max_ms ({max})")]
    InvalidLatency { min: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.greeting.starts_with("Hi! I'm your coding assistant"));
        assert!(config.fallback_message.starts_with("Sorry"));
        assert_eq!(config.latency_min_ms, 1000);
        assert_eq!(config.latency_max_ms, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"latency_max_ms": 5}"#).unwrap();
        assert_eq!(config.latency_max_ms, 5);
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.greeting, Config::default().greeting);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = Config::default_path(dir.path());

        let config = Config {
            latency_min_ms: 0,
            latency_max_ms: 10,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_inverted_latency_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"latency_min_ms": 50, "latency_max_ms": 10}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLatency { min: 50, max: 10 }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}

//! Configuration loader for Affix-Engine
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use super::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_engine")]
    pub engine: EngineConfig,

    #[serde(default)]
    pub tables: TablesConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Engine timing and native module configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_attach_timeout_ms")]
    pub attach_timeout_ms: u64,
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
    #[serde(default = "default_teardown_timeout_ms")]
    pub teardown_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_native_module")]
    pub native_module: String,
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Resolution table override locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affix_override: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_override: Option<PathBuf>,
}

impl TablesConfig {
    /// Configured affix table path, else the app-data file
    pub fn affix_path(&self, paths: Option<&AppPaths>) -> Option<PathBuf> {
        self.affix_override
            .clone()
            .or_else(|| paths.map(AppPaths::affix_table))
    }

    /// Configured skill table path, else the app-data file
    pub fn skill_path(&self, paths: Option<&AppPaths>) -> Option<PathBuf> {
        self.skill_override
            .clone()
            .or_else(|| paths.map(AppPaths::skill_table))
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads `path` when given, else the app-data `config.toml` or defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::new(path).load(),
        None => match AppPaths::discover() {
            Some(paths) => ConfigLoader::new(paths.config_file()).load_or_default(),
            None => Ok(Config::default()),
        },
    }
}

// Default functions for serde
fn default_engine() -> EngineConfig {
    let defaults = default_config().engine;
    EngineConfig {
        attach_timeout_ms: defaults.attach_timeout_ms,
        capture_timeout_ms: defaults.capture_timeout_ms,
        io_timeout_ms: defaults.io_timeout_ms,
        teardown_timeout_ms: defaults.teardown_timeout_ms,
        poll_interval_ms: defaults.poll_interval_ms,
        native_module: defaults.native_module,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_attach_timeout_ms() -> u64 {
    default_config().engine.attach_timeout_ms
}

fn default_capture_timeout_ms() -> u64 {
    default_config().engine.capture_timeout_ms
}

fn default_io_timeout_ms() -> u64 {
    default_config().engine.io_timeout_ms
}

fn default_teardown_timeout_ms() -> u64 {
    default_config().engine.teardown_timeout_ms
}

fn default_poll_interval_ms() -> u64 {
    default_config().engine.poll_interval_ms
}

fn default_native_module() -> String {
    default_config().engine.native_module
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for EngineConfig {
    fn default() -> Self {
        default_engine()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: default_engine(),
            tables: TablesConfig::default(),
            logging: default_logging(),
        }
    }
}

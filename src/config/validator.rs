//! Configuration validator for Affix-Engine
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, EngineConfig, LoggingConfig};

/// Longest time budget accepted for any single bridge call
const MAX_TIMEOUT_MS: u64 = 60_000;

const MIN_POLL_INTERVAL_MS: u64 = 50;
const MAX_POLL_INTERVAL_MS: u64 = 10_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_engine(&config.engine)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates engine configuration
    fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
        let timeouts = [
            ("attach_timeout_ms", engine.attach_timeout_ms),
            ("capture_timeout_ms", engine.capture_timeout_ms),
            ("io_timeout_ms", engine.io_timeout_ms),
            ("teardown_timeout_ms", engine.teardown_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 || value > MAX_TIMEOUT_MS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and {} ms, got {}",
                    name, MAX_TIMEOUT_MS, value
                )));
            }
        }

        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&engine.poll_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "poll_interval_ms must be between {} and {} ms, got {}",
                MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, engine.poll_interval_ms
            )));
        }

        if engine.native_module.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Native module name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

//! Default configuration values for Affix-Engine

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub engine: EngineDefaults,
    pub logging: LoggingDefaults,
}

/// Default engine timing and native module settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDefaults {
    pub attach_timeout_ms: u64,
    pub capture_timeout_ms: u64,
    pub io_timeout_ms: u64,
    pub teardown_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub native_module: String,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        engine: EngineDefaults {
            attach_timeout_ms: 5000,
            capture_timeout_ms: 5000,
            io_timeout_ms: 5000,
            teardown_timeout_ms: 2000,
            poll_interval_ms: 500,
            native_module: "Nioh3AffixCore.dll".to_string(),
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

//! Configuration module for Affix-Engine
//!
//! Provides configuration loading, validation, default settings and the
//! per-user data locations used for table overrides and presets.

mod defaults;
mod loader;
mod paths;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader};
pub use paths::{AppPaths, APP_DIR_NAME};
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{Config, EngineConfig, LoggingConfig, TablesConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

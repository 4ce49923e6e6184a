//! Application configuration.
//!
//! Loaded from an optional YAML file and `TODO__`-prefixed environment
//! variables (e.g. `TODO__DATABASE__PATH=/var/lib/todo.db`).

use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "todo.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "TODO_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "TODO";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, or ":memory:"
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("todo.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    /// Prefix of the rolling log files
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("logs"),
            app_name: "TodoBackend".to_string(),
        }
    }
}

/// Input validation limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub title_max_len: usize,
    pub color_max_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            title_max_len: 255,
            color_max_len: 8,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Sources, later overriding earlier:
    /// 1. `todo.yaml` in the current directory (if exists)
    /// 2. File given by `path` (required if provided)
    /// 3. File named by `TODO_CONFIG` (required if set)
    /// 4. `TODO__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Create config for testing: in-memory database, no log files.
    pub fn for_test() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from(":memory:"),
            },
            logging: LoggingConfig {
                enabled: false,
                ..LoggingConfig::default()
            },
            limits: LimitsConfig::default(),
        }
    }
}

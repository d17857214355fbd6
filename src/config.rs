//! Runtime configuration - TOML file plus environment overrides
//!
//! ```toml
//! [logging]
//! level = "debug"
//! json_format = false
//!
//! [sort]
//! min_merge = 32
//!
//! [io]
//! strip_input = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::builtins::set_strip_input;
use crate::logging::{self, parse_level, LogConfig};
use crate::sort::{set_min_merge, MIN_MERGE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("sort.min_merge must be at least 2, got {0}")]
    MinMerge(usize),

    #[error("invalid value '{value}' for {name}")]
    Env { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub sort: SortConfig,
    pub io: IoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub json_format: bool,
    pub show_spans: bool,
    pub track_performance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Timsort run threshold
    pub min_merge: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Strip all trailing whitespace from `input()` lines
    pub strip_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            sort: SortConfig::default(),
            io: IoConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            json_format: false,
            show_spans: false,
            track_performance: false,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            min_merge: MIN_MERGE,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self { strip_input: true }
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env { name, value }),
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        logging::log_config_loaded(&path.display().to_string());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_level(&self.logging.level).is_none() {
            return Err(ConfigError::LogLevel(self.logging.level.clone()));
        }
        if self.sort.min_merge < 2 {
            return Err(ConfigError::MinMerge(self.sort.min_merge));
        }
        Ok(())
    }

    /// Apply `PYBUILTINS_*` environment overrides
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PYBUILTINS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("PYBUILTINS_LOG_FILE") {
            self.logging.file = Some(file);
        }
        if let Some(value) = lookup("PYBUILTINS_LOG_JSON") {
            self.logging.json_format = parse_flag("PYBUILTINS_LOG_JSON", value)?;
        }
        if let Some(value) = lookup("PYBUILTINS_LOG_SPANS") {
            self.logging.show_spans = parse_flag("PYBUILTINS_LOG_SPANS", value)?;
        }
        if let Some(value) = lookup("PYBUILTINS_LOG_PERF") {
            self.logging.track_performance = parse_flag("PYBUILTINS_LOG_PERF", value)?;
        }
        if let Some(value) = lookup("PYBUILTINS_MIN_MERGE") {
            self.sort.min_merge = value.trim().parse().map_err(|_| ConfigError::Env {
                name: "PYBUILTINS_MIN_MERGE",
                value,
            })?;
        }
        if let Some(value) = lookup("PYBUILTINS_STRIP_INPUT") {
            self.io.strip_input = parse_flag("PYBUILTINS_STRIP_INPUT", value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Logging settings as a `LogConfig`
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: parse_level(&self.logging.level).unwrap_or(tracing::Level::WARN),
            file_output: self.logging.file.is_some(),
            log_path: self.logging.file.clone(),
            json_format: self.logging.json_format,
            show_spans: self.logging.show_spans,
            track_performance: self.logging.track_performance,
        }
    }

    /// Install the sort and I/O settings into the runtime
    pub fn apply(&self) {
        set_min_merge(self.sort.min_merge);
        set_strip_input(self.io.strip_input);
    }

    /// Generate default configuration file content
    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }
}

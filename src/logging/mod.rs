//! Logging infrastructure - structured tracing throughout the builtins
//!
//! Design: Builtin calls, iterator lifecycles and sort phases emit `tracing`
//! events under the `pybuiltins` target. The subscriber is installed once;
//! output goes to stderr or a daily-rolling file, as text or JSON. Timing
//! guards from `perf` only report when performance tracking is enabled.

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub use tracing::{debug, error, info, trace, warn};

/// Global logging state; holds the writer guard so buffered lines flush
static LOGGER: OnceCell<Option<WorkerGuard>> = OnceCell::new();

static TRACK_PERFORMANCE: AtomicBool = AtomicBool::new(false);

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
    /// Enable performance tracking
    pub track_performance: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
            track_performance: cfg!(debug_assertions),
        }
    }
}

/// Parse `trace`, `debug`, `info`, `warn` or `error` (any case)
pub fn parse_level(name: &str) -> Option<Level> {
    match name.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn env_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `PYBUILTINS_LOG_*` variables that are set
    pub fn apply_env(&mut self) {
        // PYBUILTINS_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("PYBUILTINS_LOG_LEVEL") {
            self.level = parse_level(&level).unwrap_or(Level::WARN);
        }

        // PYBUILTINS_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("PYBUILTINS_LOG_FILE") {
            self.file_output = true;
            self.log_path = Some(path);
        }

        if let Ok(value) = std::env::var("PYBUILTINS_LOG_JSON") {
            self.json_format = env_flag(&value);
        }

        if let Ok(value) = std::env::var("PYBUILTINS_LOG_SPANS") {
            self.show_spans = env_flag(&value);
        }

        if let Ok(value) = std::env::var("PYBUILTINS_LOG_PERF") {
            self.track_performance = env_flag(&value);
        }
    }

    /// Create high-performance config (minimal logging)
    pub fn performance() -> Self {
        Self {
            level: Level::ERROR,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
            track_performance: false,
        }
    }

    /// Create debug config (verbose logging)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            file_output: true,
            log_path: Some("pybuiltins.log".to_string()),
            json_format: false,
            show_spans: true,
            track_performance: true,
        }
    }

    /// Directory and file name for file output, if enabled
    fn file_target(&self) -> Option<(String, String)> {
        if !self.file_output {
            return None;
        }
        let path = Path::new(self.log_path.as_deref().unwrap_or("pybuiltins.log"));
        let directory = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pybuiltins.log".to_string());
        Some((directory, file))
    }
}

/// Initialize logging with default configuration
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_with_config(config: LogConfig) {
    LOGGER.get_or_init(|| {
        TRACK_PERFORMANCE.store(config.track_performance, Ordering::Relaxed);

        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "pybuiltins={}",
                config.level.as_str().to_lowercase()
            ))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let (writer, guard) = match config.file_target() {
            Some((directory, file)) => {
                tracing_appender::non_blocking(rolling::daily(directory, file))
            }
            None => tracing_appender::non_blocking(io::stderr()),
        };

        let json_layer = config.json_format.then(|| {
            fmt::layer()
                .json()
                .with_writer(writer.clone())
                .with_span_events(span_events.clone())
        });
        let text_layer = (!config.json_format).then(|| {
            fmt::layer()
                .with_writer(writer)
                .with_span_events(span_events)
                .with_target(true)
                .with_line_number(cfg!(debug_assertions))
        });

        // Another subscriber may already be installed (e.g. by a host or test)
        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(text_layer)
            .try_init()
            .is_ok();
        installed.then_some(guard)
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Log builtin function call
#[inline]
pub fn log_builtin_call(builtin: &str, arg_count: usize) {
    trace!(
        event = "builtin_call",
        function = builtin,
        args = arg_count,
        "Builtin function called"
    );
}

/// Log iterator construction
#[inline]
pub fn log_iterator_created(kind: &str) {
    trace!(event = "iterator_created", kind = kind, "Iterator created");
}

/// Log iterator exhaustion (the StopIteration boundary)
#[inline]
pub fn log_iterator_exhausted(kind: &str) {
    trace!(event = "iterator_exhausted", kind = kind, "Iterator exhausted");
}

/// Log a sorting phase
pub fn log_sort_phase(algorithm: &str, phase: &str, size: usize) {
    debug!(
        event = "sort_phase",
        algorithm = algorithm,
        phase = phase,
        size = size,
        "Sort phase"
    );
}

/// Log configuration load
pub fn log_config_loaded(source: &str) {
    info!(event = "config_loaded", source = source, "Configuration loaded");
}

/// Performance tracking utilities
pub mod perf {
    use std::sync::atomic::Ordering;
    use std::time::Instant;
    use tracing::debug;

    /// Track operation duration (returns guard that logs on drop)
    #[must_use]
    pub fn track(operation: &'static str) -> PerformanceGuard {
        PerformanceGuard {
            operation,
            start: super::TRACK_PERFORMANCE
                .load(Ordering::Relaxed)
                .then(Instant::now),
        }
    }

    pub struct PerformanceGuard {
        operation: &'static str,
        start: Option<Instant>,
    }

    impl Drop for PerformanceGuard {
        fn drop(&mut self) {
            if let Some(start) = self.start {
                debug!(
                    operation = self.operation,
                    duration_us = start.elapsed().as_micros() as u64,
                    "operation completed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.file_output);

        let perf_config = LogConfig::performance();
        assert_eq!(perf_config.level, Level::ERROR);

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_file_target_splits_path() {
        let config = LogConfig {
            file_output: true,
            log_path: Some("logs/run.log".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(
            config.file_target(),
            Some(("logs".to_string(), "run.log".to_string()))
        );

        let bare = LogConfig {
            file_output: true,
            log_path: Some("run.log".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(bare.file_target(), Some((".".to_string(), "run.log".to_string())));
        assert_eq!(LogConfig::default().file_target(), None);
    }

    #[test]
    fn test_init_idempotent() {
        init_with_config(LogConfig::performance());
        init_with_config(LogConfig::performance()); // Should not panic
        assert!(is_initialized());
    }
}

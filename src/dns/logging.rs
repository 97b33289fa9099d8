//! Structured logging setup and per-operation correlation
//!
//! Provider operations emit `tracing` events with structured fields (`zone`,
//! `key`, `record_type`). Each public operation runs inside an `operation`
//! span carrying a correlation id, so every event of one append or delete
//! batch can be grouped in JSON output.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{span, Level, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Log levels accepted in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum log level when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Emit one JSON object per event instead of pretty text
    pub json_format: bool,
    /// Write to stderr at all
    pub console_output: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
            console_output: true,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Returns false when a
/// subscriber was already installed, which is not an error.
pub fn init(config: &LoggerConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{:?}", config.level).to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let init_result = if config.console_output && config.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else if config.console_output {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .try_init()
    };

    init_result.is_ok()
}

/// Correlation context for one provider operation
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    pub id: String,
    pub operation: &'static str,
    pub zone: String,
    started_at: Instant,
}

impl CorrelationContext {
    pub fn new(operation: &'static str, zone: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operation,
            zone: zone.to_string(),
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn span(&self) -> Span {
        span!(
            Level::INFO,
            "operation",
            correlation_id = %self.id,
            operation = self.operation,
            zone = %self.zone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_context_creation() {
        let ctx = CorrelationContext::new("append", "example.com");
        assert_eq!(ctx.operation, "append");
        assert_eq!(ctx.zone, "example.com");
        assert!(Uuid::parse_str(&ctx.id).is_ok());
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        let a = CorrelationContext::new("list", "example.com");
        let b = CorrelationContext::new("list", "example.com");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_logger_config_from_toml() {
        let config: LoggerConfig = toml::from_str("level = \"debug\"\njson_format = true").unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.json_format);
        assert!(config.console_output);
    }

    #[test]
    fn test_init_twice_is_tolerated() {
        let config = LoggerConfig {
            console_output: false,
            ..LoggerConfig::default()
        };
        init(&config);
        assert!(!init(&config));
    }
}

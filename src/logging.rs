//! Structured logging setup built on `tracing`.
//!
//! The formatter emits `trace!` events for each dispatch decision and `warn!` events when a
//! value degrades to its generic display. Nothing is printed until a subscriber is installed,
//! which is what [`init_logging`] does.
//!
//! Environment variables:
//! - `RUST_LOG`: filter directives (`debug`, `ffidump::dump=trace`, ...), default `info`
//! - `FFIDUMP_LOG_FORMAT`: `pretty` (default) or `json`

use std::env;
use std::io;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub const LOG_FORMAT_ENV: &str = "FFIDUMP_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output with ANSI colours.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "dev" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log format '{0}', expected 'pretty' or 'json'")]
    InvalidFormat(String),
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("failed to install subscriber: {0}")]
    InitializationFailed(String),
}

/// Installs a global subscriber configured from `RUST_LOG` and `FFIDUMP_LOG_FORMAT`.
///
/// An unparsable format falls back to `pretty`. Fails if a global subscriber is
/// already installed.
pub fn init_logging() -> Result<(), LoggingError> {
    let format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    install(format, filter)
}

/// Installs a global subscriber with an explicit level, ignoring `RUST_LOG`.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError> {
    install(format, EnvFilter::new(Level::from(level).to_string()))
}

fn install(format: LogFormat, filter: EnvFilter) -> Result<(), LoggingError> {
    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    };
    Registry::default()
        .with(layer)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_aliases() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("prod".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LoggingError::InvalidFormat(raw)) if raw == "xml"
        ));
    }

    #[test]
    fn log_level_maps_onto_tracing_levels() {
        assert_eq!(Level::from("warning".parse::<LogLevel>().unwrap()), Level::WARN);
        assert_eq!(Level::from("trace".parse::<LogLevel>().unwrap()), Level::TRACE);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn second_initialisation_is_reported() {
        // only one global subscriber may exist per process
        let first = init_logging_with_level(LogLevel::Warn, LogFormat::Pretty);
        let second = init_logging_with_level(LogLevel::Warn, LogFormat::Json);
        assert!(first.is_ok() || second.is_err());
        assert!(matches!(second, Err(LoggingError::InitializationFailed(_))));
    }
}

//! Logging setup: rotating file sink plus optional console output.
//!
//! Every run appends to a daily-rotating `oneimage.log` in the configured
//! directory through a non-blocking writer; the returned guard must stay
//! alive for the duration of the process so buffered lines are flushed on
//! exit. Console output on stderr is opt-in via `--logging`.
//!
//! Filtering follows `RUST_LOG` when set, otherwise the level resolved from
//! the `--log-level` flag or config.

use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Cannot create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid log level '{0}': must be one of off, error, warn, info, debug, trace")]
    InvalidLevel(String),
    #[error("Logging init failed: {0}")]
    Init(String),
}

/// Filename the rotating appender derives daily log files from.
const LOG_FILE_PREFIX: &str = "oneimage.log";

/// Levels accepted from `--log-level` and config.
const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Install the global subscriber.
///
/// Keep the returned guard alive until the process exits.
pub fn init(directory: &Path, level: &str, console: bool) -> Result<WorkerGuard, LoggingError> {
    let level = level.to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return Err(LoggingError::InvalidLevel(level));
    }

    std::fs::create_dir_all(directory)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_writer, guard) = non_blocking(rolling::daily(directory, LOG_FILE_PREFIX));
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);

    let console_layer = console.then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

//! Console + file log sinks

use crate::types::{IoResultExt, SyncError};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file used when none is given on the command line
pub const DEFAULT_LOG_FILE: &str = "log_file";

/// Keeps the non-blocking file writer alive
///
/// Dropping it flushes and stops the background writer, so it must live
/// for the whole process.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Install the global subscriber: console (stderr) + log file
///
/// The file is appended to when `append` is set and truncated otherwise.
/// `RUST_LOG` overrides the level; the default is `info`, or `debug` with
/// `verbose`.
pub fn init(log_file: &Path, append: bool, verbose: bool) -> Result<LogGuard, SyncError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(log_file)
        .at(log_file)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| SyncError::Config(format!("Failed to install logger: {e}")))?;

    Ok(LogGuard { _guard: guard })
}

//! Tracing subscriber setup.
//!
//! The server logs to stderr and to a daily-rolling file under
//! `[logging] dir`. `RUST_LOG` overrides the level; otherwise it is `info`,
//! or `debug` when `[server] debug` is on. File output has ANSI colours
//! stripped.
//!
//! The returned [`WorkerGuard`] flushes the file writer on drop, so keep it
//! alive for as long as the process logs.

use crate::config::AppConfig;
use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to open log file: {0}")]
    Appender(#[from] InitError),
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// `app.log` → (`app`, `Some("log")`).
fn split_file_name(file: &str) -> (&str, Option<&str>) {
    match file.rsplit_once('.') {
        Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
            (prefix, Some(suffix))
        }
        _ => (file, None),
    }
}

/// Daily-rolling appender keeping at most `max_files` files in `dir`.
pub fn file_appender(
    dir: &Path,
    file: &str,
    max_files: usize,
) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(dir)?;
    let (prefix, suffix) = split_file_name(file);

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(max_files);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }
    Ok(builder.build(dir)?)
}

/// Install the stderr + rolling file subscriber for the server.
pub fn init(config: &AppConfig) -> Result<WorkerGuard, LoggingError> {
    let appender = file_appender(
        &config.logging.dir,
        &config.logging.file,
        config.logging.max_files,
    )?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config.server.debug))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(guard)
}

/// Stderr-only subscriber for one-shot CLI commands.
pub fn init_stderr(debug: bool) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

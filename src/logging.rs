//! Logging setup for dashlab.
//!
//! Console output always; optional daily rolling files in the app data directory
//! (`dashlab.*.log` for everything, `error.*.log` for warnings and errors).
//!
//! ```no_run
//! use dashlab::config::LoggingSettings;
//! use dashlab::logging;
//!
//! logging::init(&LoggingSettings::default()).expect("Failed to initialize logging");
//! tracing::info!("Dashboard analysis started");
//! ```

use crate::config::LoggingSettings;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the log directory, creating it if needed.
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = crate::utils::standard_paths().logs_dir;

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Builds the env filter: `RUST_LOG` wins over the configured level.
pub fn build_env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log filter '{}'", settings.level))
}

fn rolling_appender(
    log_dir: &std::path::Path,
    prefix: &str,
    max_files: usize,
) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(max_files)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Initializes the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns error if the filter is invalid, the log directory cannot be created
/// or a subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let env_filter = build_env_filter(settings)?;

    // Logs go to stderr so stdout stays clean for JSON results
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if !settings.file_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(());
    }

    let log_dir = get_log_dir()?;
    let all_logs = rolling_appender(&log_dir, "dashlab", settings.max_log_files)?;
    let error_logs = rolling_appender(&log_dir, "error", settings.max_log_files)?;

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(all_logs);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(error_logs)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    Ok(())
}

//! Tracing setup for Nimbus
//!
//! Console output at the level the operator picks, plus a full trace of the
//! last run on disk so request dispatch and hook application can be inspected
//! after the fact.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::NimbusError;

/// File name the full trace is written to inside the logs directory.
pub const LAST_RUN_LOG: &str = "nimbus-last-run.log";

/// Creates the logs directory and truncates the last-run log file.
///
/// # Errors
///
/// - `NimbusError::Io` - If the directory or file cannot be created
pub fn prepare_log_file(logs_dir: Option<&Path>) -> Result<(PathBuf, File), NimbusError> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_path)?;

    let log_file_path = logs_path.join(LAST_RUN_LOG);
    let log_file = File::create(&log_file_path)?;
    Ok((log_file_path, log_file))
}

/// Initialize tracing with dual output: console (user level) + file (full trace)
///
/// `RUST_LOG`, when set, replaces `console_level` for the console layer.
///
/// # Errors
///
/// - `NimbusError::Io` - If the logs directory or log file cannot be created
/// - `NimbusError::Configuration` - If a global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> Result<(), NimbusError> {
    let (log_file_path, log_file) = prepare_log_file(logs_dir)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| NimbusError::Configuration {
            reason: format!("failed to install tracing subscriber: {e}"),
        })?;

    tracing::info!(
        "Tracing initialized: console={}, debug_file={}",
        console_level,
        log_file_path.display()
    );

    Ok(())
}

/// CLI log levels for user control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Informational, warning, and error messages
    #[default]
    Info,
    /// Debug, informational, warning, and error messages
    Debug,
    /// All messages including per-request dispatch detail
    Trace,
}

impl CliLogLevel {
    /// Converts CLI log level to tracing Level enum.
    ///
    /// # Examples
    /// ```
    /// use nimbus_core::tracing_setup::CliLogLevel;
    ///
    /// let level = CliLogLevel::Info.as_tracing_level();
    /// assert_eq!(level, tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CliLogLevel::Error => "error",
            CliLogLevel::Warn => "warn",
            CliLogLevel::Info => "info",
            CliLogLevel::Debug => "debug",
            CliLogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

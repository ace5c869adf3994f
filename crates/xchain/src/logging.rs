//! # Logging
//!
//! `tracing` subscriber setup for the `xchain` binary.
//!
//! Command output goes to stdout, so every log layer writes to stderr or to
//! an optional daily-rolling file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xchain::logging::{init_logging, verbosity_to_level, LogConfig};
//!
//! let config = LogConfig {
//!     level: verbosity_to_level(2),
//!     ..LogConfig::default()
//! };
//! let _guard = init_logging(&config).expect("logging init");
//! tracing::debug!("resolving address builder");
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "XCHAIN_LOG";

/// Error type for logging initialisation failures.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Failed to create the log file or its directory.
    #[error("failed to create log file: {0}")]
    FileCreation(String),

    /// A global subscriber is already installed.
    #[error("failed to initialize logging: {0}")]
    SubscriberInit(String),

    /// The filter or file path is malformed.
    #[error("invalid log configuration: {0}")]
    InvalidConfig(String),
}

/// Minimum severity that is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    Info,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The matching `tracing` level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Filter directive.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line text.
    #[default]
    Compact,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
            Self::Compact => f.write_str("compact"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level; `XCHAIN_LOG` overrides it when set.
    pub level: LogLevel,
    /// Line format for stderr and file output.
    pub format: LogFormat,
    /// Optional log file, rolled daily. Its directory is created.
    pub file_path: Option<PathBuf>,
}

/// Keeps the non-blocking file writer alive; logs are flushed on drop.
pub struct LogGuard {
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn stderr_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn file_layer(
    format: LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty | LogFormat::Compact => layer.compact().boxed(),
    }
}

fn split_log_path(path: &Path) -> Result<(&Path, &str), LogError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LogError::InvalidConfig(format!("invalid log file {}", path.display())))?;
    Ok((dir, file_name))
}

/// Build the environment filter: `XCHAIN_LOG` if set, else `level`.
///
/// # Errors
///
/// Returns [`LogError::InvalidConfig`] if the directive does not parse.
pub fn build_filter(level: LogLevel) -> Result<EnvFilter, LogError> {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.is_empty() => {
            EnvFilter::try_new(directive).map_err(|e| LogError::InvalidConfig(e.to_string()))
        }
        _ => EnvFilter::try_new(level.as_str()).map_err(|e| LogError::InvalidConfig(e.to_string())),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`LogError::FileCreation`] if the log directory cannot be
/// created, [`LogError::InvalidConfig`] for a bad filter or file name, and
/// [`LogError::SubscriberInit`] if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = build_filter(config.level)?;

    let mut layers = vec![stderr_layer(config.format)];
    let mut guard = None;
    if let Some(path) = &config.file_path {
        let (dir, file_name) = split_log_path(path)?;
        std::fs::create_dir_all(dir)
            .map_err(|e| LogError::FileCreation(format!("{}: {e}", dir.display())))?;
        let (writer, worker) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));
        layers.push(file_layer(config.format, writer));
        guard = Some(worker);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard { guard })
}

/// Map `-v` repetitions to a level.
///
/// | Verbosity | Level |
/// |-----------|-------|
/// | 0         | Warn  |
/// | 1         | Info  |
/// | 2         | Debug |
/// | 3+        | Trace |
#[must_use]
pub const fn verbosity_to_level(verbosity: u8) -> LogLevel {
    match verbosity {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

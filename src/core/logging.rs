//! Diagnostic logging for the gate binaries.
//!
//! Reports are written to stdout; diagnostics always go to stderr so report
//! output stays machine-readable.

use crate::core::error::RepogateError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "REPOGATE_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// `-v` raises the default level to debug.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose { LogLevel::Debug } else { LogLevel::Warn }
    }
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global stderr subscriber.
pub fn init(level: LogLevel) -> Result<(), RepogateError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| RepogateError::LogInitError(e.to_string()))
}

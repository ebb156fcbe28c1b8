use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepogateError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Path error: {0}")]
    PathError(String),
    #[error("Failed to initialize logging: {0}")]
    LogInitError(String),
}

impl RepogateError {
    /// Process exit code for errors that escape a tool run.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

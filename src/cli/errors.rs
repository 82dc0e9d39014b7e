//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::DiskError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration could not be loaded
    ConfigError,
    /// stdin/stdout or input file failure
    IoError,
    /// Input was not valid JSON
    InvalidInput,
    /// A store operation failed
    StoreError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DISK_CLI_CONFIG_ERROR",
            Self::IoError => "DISK_CLI_IO_ERROR",
            Self::InvalidInput => "DISK_CLI_INVALID_INPUT",
            Self::StoreError => "DISK_CLI_STORE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {}", .code.code(), .message)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    #[source]
    store: Option<DiskError>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            store: None,
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The store error behind a `StoreError`
    pub fn store_error(&self) -> Option<&DiskError> {
        self.store.as_ref()
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<DiskError> for CliError {
    fn from(e: DiskError) -> Self {
        Self {
            code: CliErrorCode::StoreError,
            message: e.to_string(),
            store: Some(e),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

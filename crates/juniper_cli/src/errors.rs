//! CLI-specific error types.
//!
//! Every error ends the process with a non-zero exit code.

use juniper_core::{ConfigError, DbError, LoggingError, StoreError};
use std::fmt;
use std::io;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Environment or flag value rejected
    Config,
    /// stdout or filesystem failure
    Io,
    /// Database could not be opened or written
    Storage,
    /// Entry rejected by form validation
    InvalidInput,
    /// No entry with the given id
    NotFound,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config => "JUNIPER_CLI_CONFIG_ERROR",
            Self::Io => "JUNIPER_CLI_IO_ERROR",
            Self::Storage => "JUNIPER_CLI_STORAGE_ERROR",
            Self::InvalidInput => "JUNIPER_CLI_INVALID_INPUT",
            Self::NotFound => "JUNIPER_CLI_NOT_FOUND",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::new(CliErrorCode::NotFound, format!("no {kind} with id `{id}`"))
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::Io, e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(CliErrorCode::Io, format!("JSON error: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::Config, e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        Self::new(CliErrorCode::Config, e.to_string())
    }
}

impl From<DbError> for CliError {
    fn from(e: DbError) -> Self {
        Self::new(CliErrorCode::Storage, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        let code = match e {
            StoreError::Validation(_) => CliErrorCode::InvalidInput,
            StoreError::Serialize(_) | StoreError::Repo(_) => CliErrorCode::Storage,
        };
        Self::new(code, e.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

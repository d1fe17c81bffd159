//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve data directory, log level and summary-service settings from the
//!   environment with defaults.
//!
//! # Invariants
//! - `data_dir` is always absolute after resolution.
//! - The log level is one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "JUNIPER_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "JUNIPER_LOG_LEVEL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "JUNIPER_GEMINI_MODEL";
pub const ENV_GEMINI_ENDPOINT: &str = "JUNIPER_GEMINI_ENDPOINT";

const DEFAULT_DATA_DIR: &str = "juniper-data";
const DB_FILE_NAME: &str = "juniper.sqlite3";
const LOG_DIR_NAME: &str = "logs";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Configuration error with the offending key.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Summary service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
        }
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub log_level: &'static str,
    pub gemini: GeminiConfig,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = read(ENV_DATA_DIR).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level).map_err(|err| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                message: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let mut gemini = GeminiConfig {
            api_key: read(ENV_GEMINI_API_KEY),
            ..GeminiConfig::default()
        };
        if let Some(model) = read(ENV_GEMINI_MODEL) {
            gemini.model = model.trim().to_string();
        }
        if let Some(endpoint) = read(ENV_GEMINI_ENDPOINT) {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: ENV_GEMINI_ENDPOINT,
                    message: format!("expected an http(s) URL, got `{endpoint}`"),
                });
            }
            gemini.endpoint = endpoint;
        }

        Ok(Self {
            data_dir: absolutize(Path::new(data_dir.trim()))?,
            log_level,
            gemini,
        })
    }

    /// Replaces the data directory, resolving it against the current
    /// directory when relative.
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.data_dir = absolutize(data_dir.as_ref())?;
        Ok(self)
    }

    /// Replaces the log level.
    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level).map_err(|err| ConfigError::InvalidValue {
            key: ENV_LOG_LEVEL,
            message: err.to_string(),
        })?;
        Ok(self)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}

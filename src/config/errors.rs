//! Configuration errors

use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    /// Config file is not valid JSON for a parser configuration
    #[error("Invalid config JSON: {0}")]
    Parse(String),

    /// A field is bound to a caster that is not registered
    #[error("Field '{field}' is bound to unknown caster '{caster}'")]
    UnknownCaster { field: String, caster: String },

    /// A date pattern chrono cannot compile
    #[error("Invalid date format: '{0}'")]
    InvalidDateFormat(String),

    /// An operator was renamed to the empty string
    #[error("Operator key for '{0}' must not be empty")]
    EmptyOperatorKey(&'static str),
}

impl ConfigError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "CONFIG_INVALID_JSON",
            ConfigError::UnknownCaster { .. } => "CONFIG_UNKNOWN_CASTER",
            ConfigError::InvalidDateFormat(_) => "CONFIG_INVALID_DATE_FORMAT",
            ConfigError::EmptyOperatorKey(_) => "CONFIG_EMPTY_OPERATOR_KEY",
        }
    }
}

//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::query::QueryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or context error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// The query was rejected by the parser
    QueryRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "QUERYCAST_CLI_CONFIG_ERROR",
            Self::IoError => "QUERYCAST_CLI_IO_ERROR",
            Self::QueryRejected => "QUERYCAST_CLI_QUERY_REJECTED",
        }
    }
}

/// CLI error
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

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn query_rejected(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::QueryRejected, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
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
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("{}: {}", e.code(), e))
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::query_rejected(format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::io_error("Empty input");
        assert_eq!(err.to_string(), "QUERYCAST_CLI_IO_ERROR: Empty input");
    }

    #[test]
    fn test_query_error_conversion() {
        let err = CliError::from(QueryError::missing_reference("who"));
        assert_eq!(err.code(), &CliErrorCode::QueryRejected);
        assert!(err.message().contains("QUERY_MISSING_REFERENCE"));
        assert!(err.message().contains("who"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(ConfigError::InvalidDateFormat("%Q".to_string()));
        assert_eq!(err.code_str(), "QUERYCAST_CLI_CONFIG_ERROR");
    }
}

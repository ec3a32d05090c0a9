//! # Query Errors
//!
//! Error types raised while turning request parameters into query options.
//! Every variant carries the offending token so a rejected request can be
//! traced back to its input.

use thiserror::Error;

/// Result type for query parsing
pub type QueryResult<T> = Result<T, QueryError>;

/// Query parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The raw filter seed is not valid JSON
    #[error("Invalid JSON filter [{raw}]: {reason}")]
    InvalidJson { raw: String, reason: String },

    /// A caster rejected its input
    #[error("Invalid cast of [{raw}]: {reason}")]
    InvalidCast { raw: String, reason: String },

    /// A `${name}` placeholder has no value in the context
    #[error("Missing predefined query reference: {reference}")]
    MissingReference { reference: String },

    /// A placeholder key resolved to something that can't stand in for a key
    #[error("Invalid predefined query for key [{key}]: {reason}")]
    InvalidPredefinedQuery { key: String, reason: String },
}

impl QueryError {
    pub fn invalid_json(raw: impl Into<String>, reason: impl ToString) -> Self {
        QueryError::InvalidJson {
            raw: raw.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_cast(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::InvalidCast {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_reference(reference: impl Into<String>) -> Self {
        QueryError::MissingReference {
            reference: reference.into(),
        }
    }

    pub fn invalid_predefined(key: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::InvalidPredefinedQuery {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidJson { .. } => "QUERY_INVALID_JSON",
            QueryError::InvalidCast { .. } => "QUERY_INVALID_CAST",
            QueryError::MissingReference { .. } => "QUERY_MISSING_REFERENCE",
            QueryError::InvalidPredefinedQuery { .. } => "QUERY_INVALID_PREDEFINED",
        }
    }
}

//! `skip` and `limit` coercion

use super::errors::{QueryError, QueryResult};
use crate::cast::coerce_number;
use crate::value::Value;

/// Parse a skip count
pub fn cast_skip(raw: &str) -> QueryResult<u64> {
    cast_count(raw)
}

/// Parse a limit
pub fn cast_limit(raw: &str) -> QueryResult<u64> {
    cast_count(raw)
}

/// Accept either a number or numeric text
pub(crate) fn count_from_value(value: &Value) -> QueryResult<u64> {
    match value {
        Value::Number(n) => to_count(*n).ok_or_else(|| rejected(&value.to_token_string())),
        other => cast_count(&other.to_token_string()),
    }
}

fn cast_count(raw: &str) -> QueryResult<u64> {
    coerce_number(raw)
        .and_then(to_count)
        .ok_or_else(|| rejected(raw))
}

fn to_count(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

fn rejected(raw: &str) -> QueryError {
    QueryError::invalid_cast(raw, "expected a non-negative integer")
}

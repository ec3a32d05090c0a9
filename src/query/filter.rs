//! # Filter Grammar
//!
//! Every non-operator parameter becomes one filter token:
//!
//! ```text
//! [!]field[op][value]      op ∈ { =, !=, >, >=, <, <= } or empty
//! ```
//!
//! Tokens are folded left to right, in the order the parameters were
//! received, into one clause per field. A bare field means `$exists: true`
//! and `!field` means `$exists: false`. Lists become `$in` / `$nin`.
//!
//! An equality token replaces the whole clause of its field. A range token
//! arriving after an equality turns the field back into an operator object
//! and the equality value is lost.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::{QueryError, QueryResult};
use super::params::Params;
use crate::cast::ValueTyper;
use crate::value::{Map, Value};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(!?)([^><!=]+)([><]=?|!?=|)(.*)$").expect("filter token pattern compiles")
});

/// Comparison operators of the filter grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// No operator: bare field name
    Exists,
}

impl FilterOperator {
    /// Map operator text to its operator
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "=" => Some(FilterOperator::Eq),
            "!=" => Some(FilterOperator::Ne),
            ">" => Some(FilterOperator::Gt),
            ">=" => Some(FilterOperator::Gte),
            "<" => Some(FilterOperator::Lt),
            "<=" => Some(FilterOperator::Lte),
            "" => Some(FilterOperator::Exists),
            _ => None,
        }
    }

    /// The query operator key
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::Exists => "$exists",
        }
    }
}

/// One tokenized `key=value` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToken<'a> {
    pub negated: bool,
    pub field: &'a str,
    pub operator: FilterOperator,
    pub raw_value: &'a str,
}

impl<'a> FilterToken<'a> {
    /// Split a token into prefix, field, operator and value text.
    ///
    /// Returns `None` when the token has no field name.
    pub fn parse(token: &'a str) -> Option<Self> {
        let caps = TOKEN.captures(token)?;
        let operator = FilterOperator::from_token(caps.get(3)?.as_str())?;
        Some(Self {
            negated: caps.get(1)?.as_str() == "!",
            field: caps.get(2)?.as_str(),
            operator,
            raw_value: caps.get(4)?.as_str(),
        })
    }
}

/// Rebuild the token text for one parameter
pub fn token_text(key: &str, value: &Value) -> String {
    if value.is_blank() {
        key.to_string()
    } else {
        format!("{}={}", key, value.to_token_string())
    }
}

/// Folds request parameters into a filter object
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder<'a> {
    typer: &'a ValueTyper,
    blacklist: &'a HashSet<String>,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(typer: &'a ValueTyper, blacklist: &'a HashSet<String>) -> Self {
        Self { typer, blacklist }
    }

    /// Build the filter from an optional seed and every parameter
    pub fn build(&self, seed: Option<&Value>, params: &Params) -> QueryResult<Map> {
        let mut filter = seed_filter(seed)?;

        for (key, value) in params.iter() {
            let text = token_text(key, value);
            let Some(token) = FilterToken::parse(&text) else {
                continue;
            };
            if self.blacklist.contains(token.field) {
                continue;
            }

            let typed = if token.operator == FilterOperator::Exists && token.raw_value.is_empty() {
                None
            } else {
                Some(self.typer.parse_value(token.raw_value, Some(token.field))?)
            };

            apply_token(&mut filter, &token, typed);
        }

        Ok(filter)
    }
}

/// Parse the raw filter seed: objects pass through, text must be a JSON object
fn seed_filter(seed: Option<&Value>) -> QueryResult<Map> {
    let raw = match seed {
        None => return Ok(Map::new()),
        Some(Value::Object(map)) => return Ok(map.clone()),
        Some(value) if value.is_blank() => return Ok(Map::new()),
        Some(value) => value.to_token_string(),
    };

    let json: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| QueryError::invalid_json(raw.as_str(), e))?;

    match Value::from(json) {
        Value::Object(map) => Ok(map),
        _ => Err(QueryError::invalid_json(raw, "filter must be a JSON object")),
    }
}

fn apply_token(filter: &mut Map, token: &FilterToken<'_>, typed: Option<Value>) {
    let field = token.field;

    let value = match typed {
        Some(Value::Array(items)) => {
            let key = if token.operator == FilterOperator::Ne {
                "$nin"
            } else {
                "$in"
            };
            set_operator(filter, field, key, Value::Array(items));
            return;
        }
        other => other,
    };

    if token.operator == FilterOperator::Exists {
        set_operator(filter, field, "$exists", Value::Bool(!token.negated));
        return;
    }

    let value = value.unwrap_or(Value::Null);
    match token.operator {
        FilterOperator::Eq => {
            filter.insert(field.to_string(), value);
        }
        FilterOperator::Ne
            if matches!(value, Value::Regex(_) | Value::Date(_) | Value::Object(_)) =>
        {
            set_operator(filter, field, "$not", value);
        }
        op => set_operator(filter, field, op.as_str(), value),
    }
}

/// Set `operator` in the clause of `field`; a plain equality value is
/// replaced by a fresh operator object
fn set_operator(filter: &mut Map, field: &str, operator: &str, value: Value) {
    let entry = filter
        .entry(field.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    match entry {
        Value::Object(clause) => {
            clause.insert(operator.to_string(), value);
        }
        other => {
            let mut clause = Map::new();
            clause.insert(operator.to_string(), value);
            *other = Value::Object(clause);
        }
    }
}

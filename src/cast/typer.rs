//! Value typer: infers a typed value from a raw query token
//!
//! Resolution order, first match wins:
//! 1. caster call syntax `name(payload)` for a registered caster
//! 2. caster bound to the field name
//! 3. comma-separated list, each element typed recursively
//! 4. regex literal `/pattern/` or `/pattern/i`
//! 5. `true` / `false`
//! 6. `null`
//! 7. number, unless zero-padded (`007` stays a string)
//! 8. date, using the configured formats
//! 9. the raw string

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{coerce_number, parse_date, CasterRegistry};
use crate::query::{QueryError, QueryResult};
use crate::value::{RegexLiteral, Value};

static CASTER_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\((.*)\)$").expect("caster call pattern compiles"));

static REGEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(.*)/(i?)$").expect("regex literal pattern compiles"));

static ZERO_PADDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[0-9]+").expect("zero padding pattern compiles"));

#[derive(Debug, Clone)]
pub struct ValueTyper {
    casters: CasterRegistry,
    cast_params: HashMap<String, String>,
    date_formats: Vec<String>,
}

impl ValueTyper {
    pub fn new(
        casters: CasterRegistry,
        cast_params: HashMap<String, String>,
        date_formats: Vec<String>,
    ) -> Self {
        Self {
            casters,
            cast_params,
            date_formats,
        }
    }

    pub fn casters(&self) -> &CasterRegistry {
        &self.casters
    }

    pub fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    /// Type `raw`, using `field` to find a per-field caster
    pub fn parse_value(&self, raw: &str, field: Option<&str>) -> QueryResult<Value> {
        if let Some(caps) = CASTER_CALL.captures(raw) {
            if let Some(caster) = self.casters.get(&caps[1]) {
                return caster
                    .cast(&caps[2])
                    .map_err(|reason| QueryError::invalid_cast(raw, reason));
            }
        }

        if let Some(caster) = field
            .and_then(|f| self.cast_params.get(f))
            .and_then(|name| self.casters.get(name))
        {
            return caster
                .cast(raw)
                .map_err(|reason| QueryError::invalid_cast(raw, reason));
        }

        if raw.contains(',') {
            return raw
                .split(',')
                .map(|item| self.parse_value(item, field))
                .collect::<QueryResult<Vec<_>>>()
                .map(Value::Array);
        }

        if let Some(caps) = REGEX_LITERAL.captures(raw) {
            return Ok(Value::Regex(RegexLiteral::new(&caps[1], &caps[2] == "i")));
        }

        match raw {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" => return Ok(Value::Null),
            _ => {}
        }

        if !ZERO_PADDED.is_match(raw) {
            if let Some(n) = coerce_number(raw) {
                return Ok(Value::Number(n));
            }
        }

        if let Some(date) = parse_date(raw, &self.date_formats) {
            return Ok(Value::Date(date));
        }

        Ok(Value::string(raw))
    }
}

//! # Value Casting
//!
//! Named casters and the value typer that turns raw query tokens into
//! typed [`Value`]s.
//!
//! Casters are looked up by name, either through call syntax in the token
//! itself (`date(2020-01-01)`) or through a per-field binding configured on
//! the parser. The registry is assembled once when the parser is built and
//! never changes afterwards.

mod date;
mod number;
mod typer;

pub use date::{parse_date, validate_date_format, DEFAULT_DATE_FORMATS, RFC3339_FORMAT};
pub use number::coerce_number;
pub use typer::ValueTyper;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Converts a raw string into a typed value.
///
/// A failed conversion returns a human-readable reason; the typer wraps it
/// into `QueryError::InvalidCast` together with the offending token.
pub trait Caster: Send + Sync {
    fn cast(&self, raw: &str) -> Result<Value, String>;
}

impl<F> Caster for F
where
    F: Fn(&str) -> Result<Value, String> + Send + Sync,
{
    fn cast(&self, raw: &str) -> Result<Value, String> {
        self(raw)
    }
}

/// Built-in `string` caster: keeps the payload verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCaster;

impl Caster for StringCaster {
    fn cast(&self, raw: &str) -> Result<Value, String> {
        Ok(Value::string(raw))
    }
}

/// Built-in `date` caster: parses the payload with the configured formats
#[derive(Debug, Clone)]
pub struct DateCaster {
    formats: Vec<String>,
}

impl DateCaster {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }
}

impl Caster for DateCaster {
    fn cast(&self, raw: &str) -> Result<Value, String> {
        parse_date(raw, &self.formats)
            .map(Value::Date)
            .ok_or_else(|| format!("Invalid date string: [{}]", raw))
    }
}

/// Name-keyed set of casters
#[derive(Clone, Default)]
pub struct CasterRegistry {
    casters: HashMap<String, Arc<dyn Caster>>,
}

impl CasterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the `string` and `date` built-ins
    pub fn with_builtins(date_formats: &[String]) -> Self {
        let mut registry = Self::new();
        registry.register("string", Arc::new(StringCaster));
        registry.register("date", Arc::new(DateCaster::new(date_formats.to_vec())));
        registry
    }

    /// Register a caster, replacing any existing one with the same name
    pub fn register(&mut self, name: impl Into<String>, caster: Arc<dyn Caster>) {
        self.casters.insert(name.into(), caster);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Caster> {
        self.casters.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.casters.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.casters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CasterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasterRegistry")
            .field("casters", &self.names())
            .finish()
    }
}

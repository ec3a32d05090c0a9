//! # Query Parser
//!
//! Drives the builders over one request and assembles [`QueryOptions`].
//!
//! A parser is configured once through [`ParserBuilder`] and is immutable
//! afterwards, so one instance can serve concurrent requests.
//!
//! ```
//! use querycast::QueryParser;
//!
//! let parser = QueryParser::default();
//! let options = parser.parse("status=active&age>18&sort=-age&limit=10").unwrap();
//!
//! assert_eq!(options.limit, Some(10));
//! assert!(options.filter.contains_key("status"));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use super::errors::QueryResult;
use super::filter::FilterBuilder;
use super::options::{OperatorKeys, QueryOptions};
use super::pagination::count_from_value;
use super::params::Params;
use super::populate::{cast_populate, PopulateDescriptor};
use super::predefined;
use super::select::{cast_select, select_from_object};
use super::sort::{cast_sort, sort_from_object};
use crate::cast::{Caster, CasterRegistry, ValueTyper};
use crate::config::{ConfigResult, DateFormat, ParserConfig};
use crate::value::{Map, Value};

/// Parser input: a raw query string or already-decoded parameters
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    QueryString(String),
    Params(Params),
}

impl QueryInput {
    fn into_params(self) -> Params {
        match self {
            QueryInput::QueryString(query) => Params::from_query_string(&query),
            QueryInput::Params(params) => params,
        }
    }
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        QueryInput::QueryString(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        QueryInput::QueryString(query)
    }
}

impl From<Params> for QueryInput {
    fn from(params: Params) -> Self {
        QueryInput::Params(params)
    }
}

impl From<&Params> for QueryInput {
    fn from(params: &Params) -> Self {
        QueryInput::Params(params.clone())
    }
}

impl From<Map> for QueryInput {
    fn from(map: Map) -> Self {
        QueryInput::Params(Params::from(map))
    }
}

/// Turns request parameters into query options
#[derive(Debug, Clone)]
pub struct QueryParser {
    typer: ValueTyper,
    blacklist: HashSet<String>,
    keys: OperatorKeys,
}

impl Default for QueryParser {
    fn default() -> Self {
        let config = ParserConfig::default();
        let formats = config.date_formats();
        let keys = config.operator_keys();
        let casters = CasterRegistry::with_builtins(&formats);
        Self {
            typer: ValueTyper::new(casters, Default::default(), formats),
            blacklist: keys.all().iter().map(|k| k.to_string()).collect(),
            keys,
        }
    }
}

impl QueryParser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Build a parser from a loaded configuration, with built-in casters only
    pub fn from_config(config: ParserConfig) -> ConfigResult<Self> {
        ParserBuilder::from_config(config).build()
    }

    pub fn keys(&self) -> &OperatorKeys {
        &self.keys
    }

    /// Whether `field` is excluded from the filter grammar
    pub fn is_blacklisted(&self, field: &str) -> bool {
        self.blacklist.contains(field)
    }

    pub fn casters(&self) -> &CasterRegistry {
        self.typer.casters()
    }

    /// Parse a request into query options
    pub fn parse(&self, input: impl Into<QueryInput>) -> QueryResult<QueryOptions> {
        self.run(&input.into().into_params(), None)
    }

    /// Parse a request and resolve `${name}` placeholders against `context`
    pub fn parse_with_context(
        &self,
        input: impl Into<QueryInput>,
        context: &Value,
    ) -> QueryResult<QueryOptions> {
        self.run(&input.into().into_params(), Some(context))
    }

    /// Type a single raw token
    pub fn parse_value(&self, raw: &str, field: Option<&str>) -> QueryResult<Value> {
        self.typer.parse_value(raw, field)
    }

    /// Build a filter from an optional seed and the full parameter set
    pub fn cast_filter(&self, seed: Option<&Value>, params: &Params) -> QueryResult<Map> {
        FilterBuilder::new(&self.typer, &self.blacklist).build(seed, params)
    }

    fn run(&self, params: &Params, context: Option<&Value>) -> QueryResult<QueryOptions> {
        let keys = &self.keys;
        let mut options = QueryOptions {
            filter: self.cast_filter(params.get(&keys.filter), params)?,
            ..Default::default()
        };

        if let Some(value) = supplied(params, &keys.sort) {
            options.sort = Some(match value {
                Value::Object(map) => sort_from_object(map),
                other => cast_sort(&other.to_token_string()),
            });
        }
        if let Some(value) = supplied(params, &keys.limit) {
            options.limit = Some(count_from_value(value)?);
        }
        if let Some(value) = supplied(params, &keys.skip) {
            options.skip = Some(count_from_value(value)?);
        }
        if let Some(value) = supplied(params, &keys.select) {
            options.select = Some(match value {
                Value::Object(map) => select_from_object(map),
                other => cast_select(&other.to_token_string()),
            });
        }
        if let Some(value) = supplied(params, &keys.populate) {
            options.populate = Some(populate_from_value(value));
        }

        predefined::resolve_options(options, context)
    }
}

fn supplied<'p>(params: &'p Params, key: &str) -> Option<&'p Value> {
    params.get(key).filter(|value| !value.is_blank())
}

fn populate_from_value(value: &Value) -> Vec<PopulateDescriptor> {
    match value {
        Value::Object(_) => PopulateDescriptor::from_value(value).into_iter().collect(),
        Value::Array(items) if items.iter().all(|item| item.as_object().is_some()) => items
            .iter()
            .filter_map(PopulateDescriptor::from_value)
            .collect(),
        other => cast_populate(&other.to_token_string()),
    }
}

/// Configures and builds a [`QueryParser`]
#[derive(Default)]
pub struct ParserBuilder {
    config: ParserConfig,
    casters: Vec<(String, Arc<dyn Caster>)>,
}

impl ParserBuilder {
    /// Start from a loaded configuration
    pub fn from_config(config: ParserConfig) -> Self {
        Self {
            config,
            casters: Vec::new(),
        }
    }

    /// Use a single date pattern
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_format = Some(DateFormat::One(format.into()));
        self
    }

    /// Use an ordered list of date patterns
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.date_format = Some(DateFormat::Many(
            formats.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Exclude fields from the filter grammar
    pub fn blacklist<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .blacklist
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Register a caster, overriding a built-in of the same name
    pub fn caster<C: Caster + 'static>(mut self, name: impl Into<String>, caster: C) -> Self {
        self.casters.push((name.into(), Arc::new(caster)));
        self
    }

    /// Register a closure as a caster
    pub fn caster_fn<F>(self, name: impl Into<String>, caster: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.caster(name, caster)
    }

    /// Always type `field` with the caster called `caster`
    pub fn cast_param(mut self, field: impl Into<String>, caster: impl Into<String>) -> Self {
        self.config.cast_params.insert(field.into(), caster.into());
        self
    }

    pub fn select_key(mut self, key: impl Into<String>) -> Self {
        self.config.select_key = Some(key.into());
        self
    }

    pub fn populate_key(mut self, key: impl Into<String>) -> Self {
        self.config.populate_key = Some(key.into());
        self
    }

    pub fn sort_key(mut self, key: impl Into<String>) -> Self {
        self.config.sort_key = Some(key.into());
        self
    }

    pub fn skip_key(mut self, key: impl Into<String>) -> Self {
        self.config.skip_key = Some(key.into());
        self
    }

    pub fn limit_key(mut self, key: impl Into<String>) -> Self {
        self.config.limit_key = Some(key.into());
        self
    }

    pub fn filter_key(mut self, key: impl Into<String>) -> Self {
        self.config.filter_key = Some(key.into());
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Operator keys are appended to the blacklist.
    pub fn build(self) -> ConfigResult<QueryParser> {
        let formats = self.config.date_formats();
        let mut registry = CasterRegistry::with_builtins(&formats);
        for (name, caster) in self.casters {
            registry.register(name, caster);
        }

        self.config.validate(&registry)?;

        let keys = self.config.operator_keys();
        let mut blacklist: HashSet<String> = self.config.blacklist.iter().cloned().collect();
        blacklist.extend(keys.all().iter().map(|k| k.to_string()));

        let cast_params = self.config.cast_params.into_iter().collect();

        Ok(QueryParser {
            typer: ValueTyper::new(registry, cast_params, formats),
            blacklist,
            keys,
        })
    }
}

//! # Parser Configuration
//!
//! Everything that shapes how a parser reads a request: date formats, the
//! field blacklist, per-field caster bindings and operator key renames.
//! Loadable from a JSON file; every field is optional.
//!
//! ```json
//! {
//!   "date_format": ["%d/%m/%Y", "rfc3339"],
//!   "blacklist": ["password"],
//!   "cast_params": {"zip": "string"},
//!   "limit_key": "max"
//! }
//! ```

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cast::{validate_date_format, CasterRegistry, DEFAULT_DATE_FORMATS};
use crate::query::OperatorKeys;

/// One date pattern or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateFormat {
    One(String),
    Many(Vec<String>),
}

impl DateFormat {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            DateFormat::One(format) => vec![format.clone()],
            DateFormat::Many(formats) => formats.clone(),
        }
    }
}

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Date patterns tried in order (default: RFC 3339, ISO date-time, ISO date)
    pub date_format: Option<DateFormat>,

    /// Fields never turned into filter clauses
    pub blacklist: Vec<String>,

    /// Field → caster name
    pub cast_params: IndexMap<String, String>,

    pub select_key: Option<String>,
    pub populate_key: Option<String>,
    pub sort_key: Option<String>,
    pub skip_key: Option<String>,
    pub limit_key: Option<String>,
    pub filter_key: Option<String>,
}

impl ParserConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Date patterns in the order they are tried
    pub fn date_formats(&self) -> Vec<String> {
        match &self.date_format {
            Some(format) => format.to_vec(),
            None => DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Operator keys with renames applied
    pub fn operator_keys(&self) -> OperatorKeys {
        let defaults = OperatorKeys::default();
        let pick = |custom: &Option<String>, default: String| custom.clone().unwrap_or(default);
        OperatorKeys {
            select: pick(&self.select_key, defaults.select),
            populate: pick(&self.populate_key, defaults.populate),
            sort: pick(&self.sort_key, defaults.sort),
            skip: pick(&self.skip_key, defaults.skip),
            limit: pick(&self.limit_key, defaults.limit),
            filter: pick(&self.filter_key, defaults.filter),
        }
    }

    /// Check the configuration against the casters it will run with
    pub fn validate(&self, casters: &CasterRegistry) -> ConfigResult<()> {
        for format in self.date_formats() {
            if !validate_date_format(&format) {
                return Err(ConfigError::InvalidDateFormat(format));
            }
        }

        for (field, caster) in &self.cast_params {
            if !casters.contains(caster) {
                return Err(ConfigError::UnknownCaster {
                    field: field.clone(),
                    caster: caster.clone(),
                });
            }
        }

        let keys = self.operator_keys();
        let named = [
            ("select", &keys.select),
            ("populate", &keys.populate),
            ("sort", &keys.sort),
            ("skip", &keys.skip),
            ("limit", &keys.limit),
            ("filter", &keys.filter),
        ];
        if let Some((operator, _)) = named.iter().find(|(_, key)| key.is_empty()) {
            return Err(ConfigError::EmptyOperatorKey(*operator));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn builtins(config: &ParserConfig) -> CasterRegistry {
        CasterRegistry::with_builtins(&config.date_formats())
    }

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.date_formats().len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(config.operator_keys(), OperatorKeys::default());
        assert!(config.validate(&builtins(&config)).is_ok());
    }

    #[test]
    fn test_date_format_string_or_list() {
        let one = ParserConfig::from_json(r#"{"date_format": "%d/%m/%Y"}"#).unwrap();
        assert_eq!(one.date_formats(), vec!["%d/%m/%Y"]);

        let many = ParserConfig::from_json(r#"{"date_format": ["%Y", "rfc3339"]}"#).unwrap();
        assert_eq!(many.date_formats(), vec!["%Y", "rfc3339"]);
    }

    #[test]
    fn test_key_renames() {
        let config = ParserConfig::from_json(r#"{"limit_key": "max", "filter_key": "q"}"#).unwrap();
        let keys = config.operator_keys();
        assert_eq!(keys.limit, "max");
        assert_eq!(keys.filter, "q");
        assert_eq!(keys.sort, "sort");
    }

    #[test]
    fn test_unknown_caster_rejected() {
        let config = ParserConfig::from_json(r#"{"cast_params": {"zip": "zipcode"}}"#).unwrap();
        let err = config.validate(&builtins(&config)).unwrap_err();
        assert_eq!(err.code(), "CONFIG_UNKNOWN_CASTER");
    }

    #[test]
    fn test_bad_date_format_rejected() {
        let config = ParserConfig::from_json(r#"{"date_format": "%Q"}"#).unwrap();
        assert!(matches!(
            config.validate(&builtins(&config)),
            Err(ConfigError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = ParserConfig::from_json(r#"{"sort_key": ""}"#).unwrap();
        assert_eq!(
            config.validate(&builtins(&config)),
            Err(ConfigError::EmptyOperatorKey("sort"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"blacklist": ["password"]}}"#).unwrap();
        let config = ParserConfig::load(file.path()).unwrap();
        assert_eq!(config.blacklist, vec!["password"]);
    }

    #[test]
    fn test_load_errors() {
        let missing = ParserConfig::load(Path::new("/nonexistent/querycast.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
        assert!(matches!(ParserConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}

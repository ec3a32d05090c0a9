//! CLI command implementations
//!
//! Each command builds a parser, runs one request, and writes one JSON
//! envelope to stdout. Log lines go to stderr.

use std::fs;
use std::path::Path;

use clap::Parser;

use crate::config::ParserConfig;
use crate::observability::{log_event, Event, Logger};
use crate::query::QueryParser;
use crate::value::Value;

use super::args::{CastArgs, Cli, Command, ParseArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_query, write_error, write_response};

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    Logger::set_min_severity(cli.log_level);
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Parse(args) => parse(&args),
        Command::Cast(args) => cast(&args),
    }
}

/// Build a parser from an optional configuration file
pub fn load_parser(config: Option<&Path>) -> CliResult<QueryParser> {
    let (config, source) = match config {
        Some(path) => (ParserConfig::load(path)?, path.display().to_string()),
        None => (ParserConfig::default(), "default".to_string()),
    };

    let parser = QueryParser::from_config(config)?;
    let casters = parser.casters().names().join(",");
    log_event(
        Event::ConfigLoaded,
        &[("source", source.as_str()), ("casters", casters.as_str())],
    );

    Ok(parser)
}

/// Load the predefined-query context from inline JSON or a file
pub fn load_context(inline: Option<&str>, file: Option<&Path>) -> CliResult<Option<Value>> {
    let content = match (inline, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!(
                "Failed to read context file '{}': {}",
                path.display(),
                e
            ))
        })?,
        (None, None) => return Ok(None),
    };

    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid context JSON: {}", e)))?;
    Ok(Some(Value::from(json)))
}

/// Parse one query string and print the resulting query options
pub fn parse(args: &ParseArgs) -> CliResult<()> {
    let parser = load_parser(args.config.as_deref())?;
    let context = load_context(args.context.as_deref(), args.context_file.as_deref())?;

    let query = match &args.query {
        Some(query) => query.clone(),
        None => read_query()?,
    };

    let query_len = query.len().to_string();
    let has_context = context.is_some().to_string();
    log_event(
        Event::ParseStart,
        &[("query_len", query_len.as_str()), ("context", has_context.as_str())],
    );

    let result = match &context {
        Some(context) => parser.parse_with_context(query.as_str(), context),
        None => parser.parse(query.as_str()),
    };

    match result {
        Ok(options) => {
            let filter_keys = options.filter.len().to_string();
            let populate = options
                .populate
                .as_ref()
                .map_or(0, Vec::len)
                .to_string();
            log_event(
                Event::ParseComplete,
                &[("filter_keys", filter_keys.as_str()), ("populate", populate.as_str())],
            );
            write_response(options.to_json(), args.pretty)
        }
        Err(e) => {
            let reason = e.to_string();
            log_event(
                Event::ParseRejected,
                &[("code", e.code()), ("reason", reason.as_str())],
            );
            write_error(e.code(), &reason)?;
            Err(CliError::from(e))
        }
    }
}

/// Type one raw value and print it
pub fn cast(args: &CastArgs) -> CliResult<()> {
    let parser = load_parser(args.config.as_deref())?;

    match parser.parse_value(&args.value, args.field.as_deref()) {
        Ok(value) => {
            let kind = value_kind(&value);
            log_event(
                Event::CastComplete,
                &[
                    ("field", args.field.as_deref().unwrap_or("")),
                    ("kind", kind),
                ],
            );
            write_response(value.to_json(), args.pretty)
        }
        Err(e) => {
            let reason = e.to_string();
            log_event(
                Event::ParseRejected,
                &[("code", e.code()), ("reason", reason.as_str())],
            );
            write_error(e.code(), &reason)?;
            Err(CliError::from(e))
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Date(_) => "date",
        Value::Regex(_) => "regex",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::cli::CliErrorCode;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_parser_default() {
        let parser = load_parser(None).unwrap();
        assert!(parser.casters().contains("date"));
        assert!(parser.casters().contains("string"));
    }

    #[test]
    fn test_load_parser_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"limit_key": "max", "blacklist": ["token"]}}"#).unwrap();

        let parser = load_parser(Some(file.path())).unwrap();
        assert_eq!(parser.keys().limit, "max");
        assert!(parser.is_blacklisted("token"));
    }

    #[test]
    fn test_load_parser_rejects_unknown_caster() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"cast_params": {{"zip": "zipcode"}}}}"#).unwrap();

        let err = load_parser(Some(file.path())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_load_context_sources() {
        assert_eq!(load_context(None, None).unwrap(), None);

        let inline = load_context(Some(r#"{"who": "bob"}"#), None).unwrap();
        assert_eq!(inline, Some(Value::from(serde_json::json!({"who": "bob"}))));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"n": 1}}"#).unwrap();
        let from_file = load_context(None, Some(file.path())).unwrap();
        assert_eq!(from_file, Some(Value::from(serde_json::json!({"n": 1}))));
    }

    #[test]
    fn test_load_context_invalid_json() {
        assert!(load_context(Some("{not json"), None).is_err());
    }

    #[test]
    fn test_parse_command_rejects_bad_filter() {
        let args = ParseArgs {
            query: Some("filter={bad".to_string()),
            ..Default::default()
        };
        let err = parse(&args).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::QueryRejected);
    }

    #[test]
    fn test_cast_command() {
        let args = CastArgs {
            value: "42".to_string(),
            ..Default::default()
        };
        assert!(cast(&args).is_ok());
    }
}

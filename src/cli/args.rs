//! CLI argument definitions using clap
//!
//! Commands:
//! - querycast parse [QUERY] [--config <path>] [--context <json>]
//! - querycast cast <VALUE> [--field <name>] [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// querycast - Translate URL query strings into typed query options
#[derive(Parser, Debug)]
#[command(name = "querycast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum severity of log lines written to stderr
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Severity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a query string into query options
    Parse(ParseArgs),

    /// Type a single raw value
    Cast(CastArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ParseArgs {
    /// Query string (read from stdin if omitted)
    #[arg(allow_hyphen_values = true)]
    pub query: Option<String>,

    /// Path to a JSON parser configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Predefined-query context as inline JSON
    #[arg(long, conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Predefined-query context read from a JSON file
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CastArgs {
    /// Raw value to type
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Field name, for per-field casters
    #[arg(long)]
    pub field: Option<String>,

    /// Path to a JSON parser configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

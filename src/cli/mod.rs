//! CLI module for querycast
//!
//! Provides command-line interface for:
//! - parse: query string → query options JSON
//! - cast: raw token → typed value JSON

mod args;
mod commands;
mod errors;
mod io;

pub use args::{CastArgs, Cli, Command, ParseArgs};
pub use commands::{cast, load_context, load_parser, parse, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_query, write_error, write_response};

//! JSON I/O handling for the CLI
//!
//! - Input: one query line via stdin
//! - Output: one JSON object via stdout
//! - UTF-8 only

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a single query line from stdin
pub fn read_query() -> CliResult<String> {
    let stdin = io::stdin();
    let mut line = String::new();

    stdin.lock().read_line(&mut line)?;

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(line.to_string())
}

/// Build the success envelope
pub fn success_body(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Build the error envelope
pub fn error_body(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value, pretty: bool) -> CliResult<()> {
    write_json(&success_body(data), pretty)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&error_body(code, message), false)
}

fn write_json(body: &Value, pretty: bool) -> CliResult<()> {
    let mut stdout = io::stdout();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, body)?;
    } else {
        serde_json::to_writer(&mut stdout, body)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

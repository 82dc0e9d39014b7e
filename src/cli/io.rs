//! JSON I/O handling for the CLI
//!
//! - Input: one JSON value from `--input` or stdin
//! - Output: JSON values and plain lines on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read one JSON value from `input`, or stdin when `None`
pub fn read_value(input: Option<&Path>) -> CliResult<Value> {
    let text = match input {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    parse_value(&text)
}

/// Parse input text as a single JSON value
pub fn parse_value(text: &str) -> CliResult<Value> {
    if text.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }
    Ok(serde_json::from_str(text)?)
}

/// Write a JSON value to stdout, pretty-printed
pub fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a plain line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

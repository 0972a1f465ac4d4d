use serde::Serialize;

use crate::error::CliError;

/// Serialize a command result to stdout as JSON.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

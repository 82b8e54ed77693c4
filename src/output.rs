use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Write the accumulated entities as a pretty JSON array, to a file when a
/// path is given and to stdout otherwise.
pub fn write_entities(entities: &[Value], response_file: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(entities)
        .unwrap_or_else(|_| "[]".to_string());

    match response_file {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

//! Schema command: print the JSON Schema of the snapshot format.

use anyhow::{Context, Result};
use schemadoc::json_schema::snapshot_schema_json;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Run the schema command
pub fn run(output: Option<PathBuf>) -> Result<()> {
    let text = snapshot_schema_json().context("failed to serialize snapshot schema")?;

    match output {
        Some(path) => {
            fs::write(&path, &text)
                .with_context(|| format!("failed to write schema: {}", path.display()))?;
            eprintln!("Snapshot schema written to: {}", path.display());
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }

    Ok(())
}

//! JSON Schema for schema snapshots.
//!
//! The `json` output format and the snapshot source share one document shape;
//! the schema lets hand-written snapshots be validated before rendering.

use crate::schema::Tables;
use schemars::{schema_for, Schema};

/// Schema of the snapshot document, a top-level array of tables.
pub fn snapshot_schema() -> Schema {
    schema_for!(Tables)
}

/// Pretty-printed snapshot schema with a trailing newline.
pub fn snapshot_schema_json() -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(&snapshot_schema())?;
    text.push('\n');
    Ok(text)
}

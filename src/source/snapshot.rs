//! JSON snapshot source, the format written by `--format json`.

use super::{failed, SchemaSource};
use crate::error::{ExtractStage, Result};
use crate::schema::Tables;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::debug;

pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SchemaSource for SnapshotSource {
    fn extract(&mut self) -> Result<Tables> {
        let file = File::open(&self.path).map_err(failed(ExtractStage::Connect, None))?;
        let tables: Tables = serde_json::from_reader(BufReader::new(file))
            .map_err(failed(ExtractStage::Snapshot, None))?;

        debug!(path = %self.path.display(), tables = tables.len(), "loaded schema snapshot");
        Ok(tables)
    }

    fn describe(&self) -> String {
        format!("snapshot:{}", self.path.display())
    }
}

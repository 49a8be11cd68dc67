//! List command: print surviving table names, one per line.

use super::{FilterArgs, SourceArgs};
use anyhow::{Context, Result};
use schemadoc::source;
use std::io::{self, BufWriter, Write};

/// Run the list command
pub fn run(source: SourceArgs, filter: FilterArgs) -> Result<()> {
    let config = source.project_config()?;
    let name_filter = filter.build(&config)?;
    let (kind, target) = source.resolve(&config)?;

    let mut src = source::open(kind, &target)?;
    let tables = src
        .extract()
        .with_context(|| format!("failed to read schema from {}", src.describe()))?;

    // Extraction order, no sorting
    let mut out = BufWriter::new(io::stdout().lock());
    for name in name_filter.apply(tables).names() {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;

    Ok(())
}

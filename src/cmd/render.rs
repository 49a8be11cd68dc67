//! Render command: extract, filter, and write one output format.

use super::{FilterArgs, SourceArgs};
use anyhow::{Context, Result};
use schemadoc::render::{OutputFormat, RenderOptions, Renderer, Section};
use schemadoc::source;
use schemadoc::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the render command
#[allow(clippy::too_many_arguments)]
pub fn run(
    source: SourceArgs,
    filter: FilterArgs,
    output: Option<PathBuf>,
    format: Option<String>,
    template: Option<PathBuf>,
    fk: bool,
    truncate: Option<i64>,
    section: Option<i64>,
) -> Result<()> {
    let config = source.project_config()?;

    // Settings errors surface before touching the database
    let name_filter = filter.build(&config)?;
    let (kind, target) = source.resolve(&config)?;

    let template = template.or(config.template.clone());
    let format = resolve_format(
        format.as_deref().or(config.format.as_deref()),
        template.is_some(),
        output.as_deref(),
    )?;

    let renderer = Renderer::new(RenderOptions {
        format,
        fk: fk || config.fk.unwrap_or(false),
        truncate: truncate.or(config.truncate).unwrap_or(0),
        section: Section::new(section.or(config.section).unwrap_or(1)),
        template,
    })?;

    let mut src = source::open(kind, &target)?;
    let tables = src
        .extract()
        .with_context(|| format!("failed to read schema from {}", src.describe()))?;
    let tables = name_filter.apply(tables);

    let (table_count, column_count, reference_count) = (
        tables.len(),
        tables.column_count(),
        tables.reference_count(),
    );
    debug!(format = %format, tables = table_count, "rendering schema");

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            renderer
                .render(tables, file)
                .with_context(|| format!("failed to render {} output", format))?;

            eprintln!("Schema written to: {}", path.display());
            eprintln!(
                "Schema: {} tables, {} columns, {} relationships",
                table_count, column_count, reference_count
            );
        }
        None => {
            renderer
                .render(tables, io::stdout().lock())
                .with_context(|| format!("failed to render {} output", format))?;
        }
    }

    Ok(())
}

/// Pick the output format: an explicit name wins, then `--template`, then the
/// output file extension, then DOT.
fn resolve_format(
    explicit: Option<&str>,
    has_template: bool,
    output: Option<&Path>,
) -> Result<OutputFormat, Error> {
    if let Some(name) = explicit {
        return name.parse().map_err(Error::Config);
    }
    if has_template {
        return Ok(OutputFormat::Template);
    }

    Ok(output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_precedence() {
        assert_eq!(
            resolve_format(Some("d2"), true, Some(Path::new("out.md"))).unwrap(),
            OutputFormat::D2
        );
        assert_eq!(
            resolve_format(None, true, Some(Path::new("out.md"))).unwrap(),
            OutputFormat::Template
        );
        assert_eq!(
            resolve_format(None, false, Some(Path::new("out.htm"))).unwrap(),
            OutputFormat::Html
        );
        assert_eq!(resolve_format(None, false, None).unwrap(), OutputFormat::Dot);
        assert_eq!(
            resolve_format(None, false, Some(Path::new("out.svg"))).unwrap(),
            OutputFormat::Dot
        );
    }

    #[test]
    fn test_resolve_format_unknown_name() {
        let err = resolve_format(Some("svg"), false, None).unwrap_err();
        assert!(err.to_string().contains("Valid options"));
    }
}

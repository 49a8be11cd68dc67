//! Output formats for a filtered schema.
//!
//! This module provides:
//! - Graphviz DOT with HTML-like table nodes and column-anchored edges
//! - D2 `sql_table` shapes
//! - Markdown and HTML reference tables
//! - User-supplied minijinja templates
//! - JSON snapshots of the model

mod custom;
mod d2;
mod dot;
pub mod engine;
mod html;
mod json;
mod markdown;

pub use custom::write_custom;
pub use d2::write_d2;
pub use dot::write_dot;
pub use engine::TemplateEngine;
pub use html::write_html;
pub use json::write_json;
pub use markdown::write_markdown;

use crate::error::{Error, Result};
use crate::schema::Tables;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for schema rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// D2 diagram language
    D2,
    /// Markdown reference tables
    Markdown,
    /// HTML reference tables
    Html,
    /// JSON snapshot of the model
    Json,
    /// User-supplied template
    Template,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "d2" => Ok(OutputFormat::D2),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "template" | "custom" => Ok(OutputFormat::Template),
            _ => Err(format!(
                "Unknown format: {}. Valid options: dot, d2, markdown, html, json, template",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::D2 => write!(f, "d2"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Template => write!(f, "template"),
        }
    }
}

impl OutputFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "dot" | "gv" => Some(OutputFormat::Dot),
            "d2" => Some(OutputFormat::D2),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "html" | "htm" => Some(OutputFormat::Html),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Heading level for Markdown and HTML output, always within 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section(u8);

impl Section {
    /// Out-of-range levels fall back to 1.
    pub fn new(level: i64) -> Self {
        match u8::try_from(level) {
            Ok(n @ 1..=6) => Section(n),
            _ => Section(1),
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// `#` repeated `level` times
    pub fn markdown_marker(&self) -> String {
        "#".repeat(self.0 as usize)
    }
}

impl Default for Section {
    fn default() -> Self {
        Section(1)
    }
}

/// Settings that shape a single render
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Add a foreign-key column to Graphviz table nodes
    pub fk: bool,
    /// Graphviz: show at most this many columns per table; `<= 0` disables
    pub truncate: i64,
    pub section: Section,
    /// Template file for [`OutputFormat::Template`]
    pub template: Option<PathBuf>,
}

/// A renderer bound to one output format with its template compiled
pub struct Renderer {
    engine: TemplateEngine,
    options: RenderOptions,
    template_name: Option<String>,
}

impl Renderer {
    /// Compile whatever template the format needs. Fails before any output is
    /// produced if the template is missing or malformed.
    pub fn new(options: RenderOptions) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        let template_name = match options.format {
            OutputFormat::Dot => {
                engine.compile(dot::TEMPLATE_NAME, dot::TEMPLATE)?;
                None
            }
            OutputFormat::Markdown => {
                engine.compile(markdown::TEMPLATE_NAME, markdown::TEMPLATE)?;
                None
            }
            OutputFormat::Html => {
                engine.compile(html::TEMPLATE_NAME, html::TEMPLATE)?;
                None
            }
            OutputFormat::Template => {
                let path = options.template.as_ref().ok_or_else(|| {
                    Error::config("the template format needs a --template file")
                })?;
                Some(engine.compile_file(path)?)
            }
            OutputFormat::D2 | OutputFormat::Json => None,
        };

        Ok(Self {
            engine,
            options,
            template_name,
        })
    }

    /// Render `tables` into `out`, flushing before returning.
    pub fn render<W: Write>(&self, tables: Tables, out: W) -> Result<()> {
        let opts = &self.options;
        match opts.format {
            OutputFormat::Dot => write_dot(out, &self.engine, tables, opts.fk, opts.truncate),
            OutputFormat::D2 => write_d2(out, tables),
            OutputFormat::Markdown => write_markdown(out, &self.engine, tables, opts.section),
            OutputFormat::Html => write_html(out, &self.engine, tables, opts.section),
            OutputFormat::Json => write_json(out, tables),
            OutputFormat::Template => {
                let name = self
                    .template_name
                    .as_deref()
                    .ok_or_else(|| Error::config("no template compiled"))?;
                write_custom(out, &self.engine, name, &tables, opts)
            }
        }
    }

    /// Render into an in-memory string.
    pub fn render_to_string(&self, tables: Tables) -> Result<String> {
        let mut buf = Vec::new();
        self.render(tables, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Output(std::io::Error::other(e)))
    }
}

//! Database schema documentation.
//!
//! Extract tables, columns and foreign keys from SQLite, PostgreSQL, DuckDB
//! or a JSON snapshot, narrow them with include/exclude name lists, and render
//! them as Graphviz, D2, Markdown, HTML, JSON or through a user template.
//!
//! ```no_run
//! use schemadoc::render::{OutputFormat, RenderOptions, Renderer};
//! use schemadoc::source::{self, SourceKind};
//!
//! # fn main() -> schemadoc::Result<()> {
//! let tables = source::open(SourceKind::Sqlite, "app.db")?.extract()?;
//! let exclude: &[&str] = &["sqlite_*"];
//! let tables = schemadoc::schema::filter(tables, exclude, &[])?;
//!
//! let renderer = Renderer::new(RenderOptions {
//!     format: OutputFormat::Markdown,
//!     ..RenderOptions::default()
//! })?;
//! renderer.render(tables, std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod json_schema;
pub mod render;
pub mod schema;
pub mod source;

pub use error::{Error, ExtractStage, Result};
pub use schema::{Column, DefaultValue, ForeignKey, Table, TableKind, Tables};

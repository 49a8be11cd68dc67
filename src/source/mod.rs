//! Schema extraction from live databases and snapshots.
//!
//! Every source enumerates tables and views, then reads the ordered columns
//! and the foreign keys of each one into the common [`Tables`] model.

mod duckdb;
mod postgres;
mod snapshot;
mod sqlite;

pub use self::duckdb::DuckDbSource;
pub use self::postgres::PostgresSource;
pub use self::snapshot::SnapshotSource;
pub use self::sqlite::SqliteSource;

use crate::error::{BoxError, Error, ExtractStage, Result};
use crate::schema::Tables;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Something that can produce a schema model
pub trait SchemaSource {
    /// Read every table, view, column and foreign key.
    fn extract(&mut self) -> Result<Tables>;

    /// Human-readable description for status messages
    fn describe(&self) -> String;
}

/// Kind of schema source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sqlite,
    Postgres,
    DuckDb,
    Snapshot,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(SourceKind::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(SourceKind::Postgres),
            "duckdb" => Ok(SourceKind::DuckDb),
            "snapshot" | "json" => Ok(SourceKind::Snapshot),
            _ => Err(format!(
                "Unknown source: {}. Valid options: sqlite, postgres, duckdb, snapshot",
                s
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Sqlite => write!(f, "sqlite"),
            SourceKind::Postgres => write!(f, "postgres"),
            SourceKind::DuckDb => write!(f, "duckdb"),
            SourceKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl SourceKind {
    /// Guess the source kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "db" | "sqlite" | "sqlite3" => Some(SourceKind::Sqlite),
            "duckdb" | "ddb" => Some(SourceKind::DuckDb),
            "json" => Some(SourceKind::Snapshot),
            _ => None,
        }
    }
}

/// Open a source of the given kind. `target` is a file path, or a connection
/// URL for Postgres.
pub fn open(kind: SourceKind, target: &str) -> Result<Box<dyn SchemaSource>> {
    if target.is_empty() {
        return Err(Error::config(format!(
            "the {} source needs a {}",
            kind,
            if kind == SourceKind::Postgres {
                "connection URL (or PGDATABASE_URL)"
            } else {
                "database file"
            }
        )));
    }

    Ok(match kind {
        SourceKind::Sqlite => Box::new(SqliteSource::new(PathBuf::from(target))),
        SourceKind::Postgres => Box::new(PostgresSource::new(target)),
        SourceKind::DuckDb => Box::new(DuckDbSource::new(PathBuf::from(target))),
        SourceKind::Snapshot => Box::new(SnapshotSource::new(PathBuf::from(target))),
    })
}

/// Current-thread runtime for the sqlx-backed sources.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::extraction(ExtractStage::Connect, None, e))
}

/// `map_err` adapter tagging a driver error with its stage and table.
fn failed<'a, E: Into<BoxError>>(
    stage: ExtractStage,
    table: Option<&'a str>,
) -> impl Fn(E) -> Error + 'a {
    move |e| Error::extraction(stage, table, e)
}

/// Double-quote an identifier for interpolation into PRAGMA statements.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

//! SQLite extraction through `sqlite_master` and the table PRAGMAs.

use super::{failed, quote_ident, runtime, SchemaSource};
use crate::error::{ExtractStage, Result};
use crate::schema::{Column, DefaultValue, ForeignKey, Table, TableKind, Tables};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row};
use std::path::PathBuf;
use tracing::debug;

const LIST_TABLES: &str =
    "select type, name from sqlite_master where type = 'table' or type = 'view'";

/// Reads a SQLite database file, opened read-only
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn extract_async(&self) -> Result<Tables> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(failed(ExtractStage::Connect, None))?;

        let rows = sqlx::query(LIST_TABLES)
            .fetch_all(&mut conn)
            .await
            .map_err(failed(ExtractStage::ListTables, None))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            let kind: String = row
                .try_get("type")
                .map_err(failed(ExtractStage::ListTables, None))?;
            let name: String = row
                .try_get("name")
                .map_err(failed(ExtractStage::ListTables, None))?;

            let mut table = Table::new(name);
            table.kind = kind.parse().unwrap_or(TableKind::Table);
            tables.push(table);
        }
        debug!(path = %self.path.display(), tables = tables.len(), "listed sqlite tables");

        for table in &mut tables {
            let sql = format!("PRAGMA table_info({})", quote_ident(&table.name));
            let rows = sqlx::query(&sql)
                .fetch_all(&mut conn)
                .await
                .map_err(failed(ExtractStage::Columns, Some(table.name.as_str())))?;
            table.columns = rows
                .iter()
                .map(read_column)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(failed(ExtractStage::Columns, Some(table.name.as_str())))?;

            let sql = format!("PRAGMA foreign_key_list({})", quote_ident(&table.name));
            let rows = sqlx::query(&sql)
                .fetch_all(&mut conn)
                .await
                .map_err(failed(ExtractStage::ForeignKeys, Some(table.name.as_str())))?;
            table.references = rows
                .iter()
                .map(read_foreign_key)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(failed(ExtractStage::ForeignKeys, Some(table.name.as_str())))?;

            debug!(
                table = %table.name,
                columns = table.columns.len(),
                foreign_keys = table.references.len(),
                "read sqlite table"
            );
        }

        conn.close().await.ok();

        Ok(resolve_implicit_targets(Tables::new(tables)))
    }
}

impl SchemaSource for SqliteSource {
    fn extract(&mut self) -> Result<Tables> {
        runtime()?.block_on(self.extract_async())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

fn read_column(row: &SqliteRow) -> std::result::Result<Column, sqlx::Error> {
    let not_null: i64 = row.try_get("notnull")?;
    let pk: i64 = row.try_get("pk")?;
    let default: Option<String> = row.try_get("dflt_value")?;

    Ok(Column {
        name: row.try_get("name")?,
        col_type: row.try_get("type")?,
        not_null: not_null == 1,
        default: default.map(DefaultValue::Text),
        // pk is the 1-based position within the primary key, 0 otherwise
        primary_key: pk > 0,
    })
}

fn read_foreign_key(row: &SqliteRow) -> std::result::Result<ForeignKey, sqlx::Error> {
    let seq: i64 = row.try_get("seq")?;
    let to_column: Option<String> = row.try_get("to")?;

    Ok(ForeignKey {
        sequence: seq + 1,
        from_column: row.try_get("from")?,
        to_table: row.try_get("table")?,
        to_column: to_column.unwrap_or_default(),
    })
}

/// `REFERENCES parent` without a column list targets the parent's primary
/// key, which SQLite reports as a NULL `to` column.
fn resolve_implicit_targets(tables: Tables) -> Tables {
    let mut fixes = Vec::new();
    for (i, table) in tables.iter().enumerate() {
        for (j, r) in table.references.iter().enumerate() {
            if !r.to_column.is_empty() {
                continue;
            }
            let Some((_, parent)) = tables.table(&r.to_table) else {
                continue;
            };
            let pk_columns: Vec<_> = parent.columns.iter().filter(|c| c.primary_key).collect();
            let part = (r.sequence.max(1) - 1) as usize;
            if let Some(col) = pk_columns.get(part) {
                fixes.push((i, j, col.name.clone()));
            }
        }
    }

    let mut inner = tables.into_inner();
    for (i, j, column) in fixes {
        inner[i].references[j].to_column = column;
    }
    Tables::new(inner)
}

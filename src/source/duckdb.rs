//! DuckDB extraction through `information_schema`, `pragma_table_info` and
//! `duckdb_constraints()`.

use super::{failed, SchemaSource};
use crate::error::{ExtractStage, Result};
use crate::schema::{Column, DefaultValue, ForeignKey, Table, TableKind, Tables};
use ::duckdb::{params, AccessMode, Config, Connection};
use std::path::PathBuf;
use tracing::debug;

const LIST_TABLES: &str = "
SELECT table_type, table_name
FROM information_schema.tables
WHERE table_catalog = current_database()
  AND table_schema NOT IN ('information_schema', 'pg_catalog')
";

// Parallel unnests zip the key columns with the referenced columns
const LIST_FOREIGN_KEYS: &str = "
SELECT
    constraint_index,
    unnest(constraint_column_names) AS from_column,
    referenced_table,
    unnest(referenced_column_names) AS to_column
FROM duckdb_constraints()
WHERE constraint_type = 'FOREIGN KEY'
  AND database_name = current_database()
  AND table_name = ?
";

/// Reads a DuckDB database file, opened read-only
pub struct DuckDbSource {
    path: PathBuf,
}

impl DuckDbSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> Result<Connection> {
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(failed(ExtractStage::Connect, None))?;
        Connection::open_with_flags(&self.path, config).map_err(failed(ExtractStage::Connect, None))
    }
}

impl SchemaSource for DuckDbSource {
    fn extract(&mut self) -> Result<Tables> {
        let conn = self.open()?;

        let mut tables = list_tables(&conn).map_err(failed(ExtractStage::ListTables, None))?;
        debug!(path = %self.path.display(), tables = tables.len(), "listed duckdb tables");

        for table in &mut tables {
            let name = table.name.clone();
            table.columns = read_columns(&conn, &name)
                .map_err(failed(ExtractStage::Columns, Some(name.as_str())))?;
            table.references = read_foreign_keys(&conn, &name)
                .map_err(failed(ExtractStage::ForeignKeys, Some(name.as_str())))?;

            debug!(
                table = %table.name,
                columns = table.columns.len(),
                foreign_keys = table.references.len(),
                "read duckdb table"
            );
        }

        Ok(Tables::new(tables))
    }

    fn describe(&self) -> String {
        format!("duckdb:{}", self.path.display())
    }
}

fn list_tables(conn: &Connection) -> ::duckdb::Result<Vec<Table>> {
    let mut stmt = conn.prepare(LIST_TABLES)?;
    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(0)?;
        let name: String = row.get(1)?;
        Ok((kind, name))
    })?;

    let mut tables = Vec::new();
    for row in rows {
        let (kind, name) = row?;
        let mut table = Table::new(name);
        table.kind = kind.parse().unwrap_or(TableKind::Table);
        tables.push(table);
    }
    Ok(tables)
}

fn read_columns(conn: &Connection, table: &str) -> ::duckdb::Result<Vec<Column>> {
    let sql = format!(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info('{}')",
        table.replace('\'', "''")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let default: Option<String> = row.get(3)?;
        Ok(Column {
            name: row.get(0)?,
            col_type: row.get(1)?,
            not_null: row.get(2)?,
            default: default.map(DefaultValue::Text),
            primary_key: row.get(4)?,
        })
    })?;

    rows.collect()
}

fn read_foreign_keys(conn: &Connection, table: &str) -> ::duckdb::Result<Vec<ForeignKey>> {
    let mut stmt = conn.prepare(LIST_FOREIGN_KEYS)?;
    let rows = stmt.query_map(params![table], |row| {
        let constraint: i64 = row.get(0)?;
        let fk = ForeignKey::new(
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        );
        Ok((constraint, fk))
    })?;

    let mut references = Vec::new();
    let mut current: Option<i64> = None;
    let mut sequence = 0;
    for row in rows {
        let (constraint, fk) = row?;
        if current == Some(constraint) {
            sequence += 1;
        } else {
            current = Some(constraint);
            sequence = 1;
        }
        references.push(fk.with_sequence(sequence));
    }
    Ok(references)
}

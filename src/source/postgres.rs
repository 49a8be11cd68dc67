//! PostgreSQL extraction through `pg_catalog` and `information_schema`.

use super::{failed, runtime, SchemaSource};
use crate::error::{ExtractStage, Result};
use crate::schema::{Column, DefaultValue, ForeignKey, Table, TableKind, Tables};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Row};
use tracing::debug;

const LIST_TABLES: &str = r#"
select
    'table'::text as type,
    tablename::text as name
from
    pg_catalog.pg_tables
where
    schemaname != 'pg_catalog' and
    schemaname != 'information_schema'
union
select
    'view'::text as type,
    viewname::text as name
from
    pg_catalog.pg_views
where
    schemaname != 'pg_catalog' and
    schemaname != 'information_schema'
"#;

const LIST_COLUMNS: &str = r#"
select
    c.column_name::text as column_name,
    c.udt_name::text as udt_name,
    c.column_default::text as column_default,
    c.is_nullable = 'YES' as is_nullable,
    exists (
        select 1
        from
            information_schema.table_constraints as tc
            join information_schema.key_column_usage as kcu
              on tc.constraint_name = kcu.constraint_name
              and tc.table_schema = kcu.table_schema
        where
            tc.constraint_type = 'PRIMARY KEY' and
            tc.table_schema = c.table_schema and
            tc.table_name = c.table_name and
            kcu.column_name = c.column_name
    ) as is_primary_key
from
    information_schema.columns as c
where
    c.table_name = $1
order by c.ordinal_position
"#;

const LIST_FOREIGN_KEYS: &str = r#"
select
    kcu.column_name::text as from_column,
    ccu.table_name::text as to_table,
    ccu.column_name::text as to_column
from
    information_schema.table_constraints as tc
    join information_schema.key_column_usage as kcu
      on tc.constraint_name = kcu.constraint_name
      and tc.table_schema = kcu.table_schema
    join information_schema.constraint_column_usage as ccu
      on ccu.constraint_name = tc.constraint_name
      and ccu.table_schema = tc.table_schema
where tc.constraint_type = 'FOREIGN KEY' and tc.table_name = $1
"#;

/// Reads every non-system schema of a PostgreSQL database
pub struct PostgresSource {
    url: String,
}

impl PostgresSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn extract_async(&self) -> Result<Tables> {
        let mut conn = PgConnection::connect(&self.url)
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
        debug!(tables = tables.len(), "listed postgres tables");

        for table in &mut tables {
            let name = table.name.clone();

            let rows = sqlx::query(LIST_COLUMNS)
                .bind(name.as_str())
                .fetch_all(&mut conn)
                .await
                .map_err(failed(ExtractStage::Columns, Some(name.as_str())))?;
            table.columns = rows
                .iter()
                .map(read_column)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(failed(ExtractStage::Columns, Some(name.as_str())))?;

            let rows = sqlx::query(LIST_FOREIGN_KEYS)
                .bind(name.as_str())
                .fetch_all(&mut conn)
                .await
                .map_err(failed(ExtractStage::ForeignKeys, Some(name.as_str())))?;
            let mut references = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let fk = read_foreign_key(row)
                    .map_err(failed(ExtractStage::ForeignKeys, Some(name.as_str())))?;
                // information_schema has no part ordinal here; number keys in order
                references.push(fk.with_sequence(i as i64 + 1));
            }
            table.references = references;

            debug!(
                table = %table.name,
                columns = table.columns.len(),
                foreign_keys = table.references.len(),
                "read postgres table"
            );
        }

        conn.close().await.ok();
        Ok(Tables::new(tables))
    }
}

impl SchemaSource for PostgresSource {
    fn extract(&mut self) -> Result<Tables> {
        runtime()?.block_on(self.extract_async())
    }

    fn describe(&self) -> String {
        "postgres".to_string()
    }
}

fn read_column(row: &PgRow) -> std::result::Result<Column, sqlx::Error> {
    let nullable: bool = row.try_get("is_nullable")?;
    let default: Option<String> = row.try_get("column_default")?;

    Ok(Column {
        name: row.try_get("column_name")?,
        col_type: row.try_get("udt_name")?,
        not_null: !nullable,
        default: default.map(DefaultValue::Text),
        primary_key: row.try_get("is_primary_key")?,
    })
}

fn read_foreign_key(row: &PgRow) -> std::result::Result<ForeignKey, sqlx::Error> {
    Ok(ForeignKey::new(
        row.try_get::<String, _>("from_column")?,
        row.try_get::<String, _>("to_table")?,
        row.try_get::<String, _>("to_column")?,
    ))
}

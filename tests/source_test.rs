//! Extraction tests against real SQLite and DuckDB files.

use schemadoc::source::{self, DuckDbSource, SchemaSource, SourceKind, SqliteSource};
use schemadoc::{DefaultValue, Error, ExtractStage, ForeignKey, Tables};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;
use tempfile::TempDir;

const SQLITE_SCHEMA: &str = r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL,
    nickname TEXT DEFAULT 'anon'
);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    note TEXT
);
CREATE TABLE audit (
    id INTEGER PRIMARY KEY,
    user_id INTEGER REFERENCES users
);
CREATE VIEW big_orders AS SELECT id FROM orders;
"#;

const DUCKDB_SCHEMA: &str = r#"
CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR NOT NULL);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER REFERENCES users(id),
    total DECIMAL(10, 2) DEFAULT 0
);
CREATE VIEW big_orders AS SELECT id FROM orders;
"#;

fn create_sqlite(path: &Path) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        sqlx::raw_sql(SQLITE_SCHEMA).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
    });
}

fn create_duckdb(path: &Path) {
    let conn = duckdb::Connection::open(path).unwrap();
    conn.execute_batch(DUCKDB_SCHEMA).unwrap();
}

fn sqlite_fixture() -> (TempDir, Tables) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");
    create_sqlite(&path);

    let tables = SqliteSource::new(path).extract().unwrap();
    (dir, tables)
}

#[test]
fn test_sqlite_lists_tables_and_views_in_order() {
    let (_dir, tables) = sqlite_fixture();
    let names: Vec<_> = tables.names().collect();
    assert_eq!(names, vec!["users", "orders", "audit", "big_orders"]);
    assert!(tables[3].is_view());
    assert!(!tables[0].is_view());
}

#[test]
fn test_sqlite_columns() {
    let (_dir, tables) = sqlite_fixture();
    let (_, users) = tables.table("users").unwrap();

    let names: Vec<_> = users.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "nickname"]);

    assert!(users.columns[0].primary_key);
    assert_eq!(users.columns[0].col_type, "INTEGER");
    assert!(users.columns[1].not_null);
    assert!(!users.columns[1].primary_key);
    assert_eq!(
        users.columns[2].default,
        Some(DefaultValue::Text("'anon'".to_string()))
    );
    assert_eq!(users.columns[1].default, None);
}

#[test]
fn test_sqlite_foreign_keys() {
    let (_dir, tables) = sqlite_fixture();

    let (_, orders) = tables.table("orders").unwrap();
    assert_eq!(orders.references, vec![ForeignKey::new("user_id", "users", "id")]);

    // implicit target resolves to the parent's primary key
    let (_, audit) = tables.table("audit").unwrap();
    assert_eq!(audit.references[0].to_column, "id");
    assert_eq!(audit.references[0].sequence, 1);
}

#[test]
fn test_sqlite_through_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.sqlite");
    create_sqlite(&path);

    let mut source = source::open(SourceKind::Sqlite, path.to_str().unwrap()).unwrap();
    assert!(source.describe().starts_with("sqlite:"));
    assert_eq!(source.extract().unwrap().len(), 4);
}

#[test]
fn test_duckdb_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.duckdb");
    create_duckdb(&path);

    let tables = DuckDbSource::new(path).extract().unwrap().sorted();
    let names: Vec<_> = tables.names().collect();
    assert_eq!(names, vec!["big_orders", "orders", "users"]);
    assert!(tables[0].is_view());

    let (_, users) = tables.table("users").unwrap();
    assert!(users.columns[0].primary_key);
    assert!(users.columns[1].not_null);
    assert!(users.references.is_empty());

    let (_, orders) = tables.table("orders").unwrap();
    assert_eq!(orders.columns.len(), 3);
    assert!(orders.columns[2].default.is_some());
    assert_eq!(orders.references, vec![ForeignKey::new("user_id", "users", "id")]);
}

#[test]
fn test_duckdb_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DuckDbSource::new(dir.path().join("missing.duckdb"))
        .extract()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Extraction {
            stage: ExtractStage::Connect,
            ..
        }
    ));
}

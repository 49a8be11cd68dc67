//! Schema model shared by every source and renderer.
//!
//! This module provides:
//! - Data models for tables, columns, and foreign keys
//! - Linear lookups by table, column, and referencing column
//! - Include/exclude name filtering (see [`filter`])

pub mod filter;

pub use filter::{filter, FilterMode, NameFilter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Whether a relation is a base table or a view
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Table,
    View,
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "base table" => Ok(TableKind::Table),
            "view" => Ok(TableKind::View),
            _ => Err(format!("Unknown table kind: {}. Valid options: table, view", s)),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Table => write!(f, "table"),
            TableKind::View => write!(f, "view"),
        }
    }
}

/// Column default as reported by the database.
///
/// Absence is modelled as `Option::None` on [`Column::default`], so an empty
/// string default stays distinguishable from no default at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DefaultValue {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Integer(n) => write!(f, "{}", n),
            DefaultValue::Real(n) => write!(f, "{}", n),
            DefaultValue::Boolean(b) => write!(f, "{}", b),
            DefaultValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(s: &str) -> Self {
        DefaultValue::Text(s.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(s: String) -> Self {
        DefaultValue::Text(s)
    }
}

impl From<i64> for DefaultValue {
    fn from(n: i64) -> Self {
        DefaultValue::Integer(n)
    }
}

impl From<f64> for DefaultValue {
    fn from(n: f64) -> Self {
        DefaultValue::Real(n)
    }
}

impl From<bool> for DefaultValue {
    fn from(b: bool) -> Self {
        DefaultValue::Boolean(b)
    }
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Raw database type name
    #[serde(rename = "type", default)]
    pub col_type: String,
    /// Whether the column is declared NOT NULL
    #[serde(default)]
    pub not_null: bool,
    /// Declared default, if any
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Whether the column is part of the primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            ..Self::default()
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark as primary key. Primary keys are implicitly NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A reference from one column of the owning table to a column of `to_table`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    /// 1-based position within a composite key
    #[serde(default = "first_sequence")]
    pub sequence: i64,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

fn first_sequence() -> i64 {
    1
}

impl ForeignKey {
    pub fn new(
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            sequence: 1,
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
        }
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = sequence;
        self
    }
}

/// One table or view with its columns and outgoing references
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    #[serde(default)]
    pub kind: TableKind,
    pub name: String,
    /// Columns in declared order; positions double as diagram ports
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub references: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self {
            kind: TableKind::View,
            ..Self::new(name)
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_reference(mut self, reference: ForeignKey) -> Self {
        self.references.push(reference);
        self
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }

    /// Find a column by exact name, returning its position.
    pub fn column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns.iter().enumerate().find(|(_, c)| c.name == name)
    }

    /// Find the first foreign key whose source column is `column`.
    ///
    /// Composite keys list the same source column once per part; only the
    /// first entry is ever returned.
    pub fn refers(&self, column: &str) -> Option<(usize, &ForeignKey)> {
        self.references
            .iter()
            .enumerate()
            .find(|(_, r)| r.from_column == column)
    }
}

/// The set of tables handed from a source to the renderers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Tables(Vec<Table>);

impl Tables {
    pub fn new(tables: Vec<Table>) -> Self {
        Self(tables)
    }

    /// Find a table by exact (case-sensitive) name, returning its position.
    pub fn table(&self, name: &str) -> Option<(usize, &Table)> {
        self.0.iter().enumerate().find(|(_, t)| t.name == name)
    }

    /// Sort in place by name using ordinal (byte-wise) comparison.
    pub fn sort_by_name(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn sorted(mut self) -> Self {
        self.sort_by_name();
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|t| t.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.0.iter().map(|t| t.columns.len()).sum()
    }

    pub fn reference_count(&self) -> usize {
        self.0.iter().map(|t| t.references.len()).sum()
    }

    pub fn into_inner(self) -> Vec<Table> {
        self.0
    }
}

impl Deref for Tables {
    type Target = [Table];

    fn deref(&self) -> &[Table] {
        &self.0
    }
}

impl From<Vec<Table>> for Tables {
    fn from(tables: Vec<Table>) -> Self {
        Self(tables)
    }
}

impl FromIterator<Table> for Tables {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Tables {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tables {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

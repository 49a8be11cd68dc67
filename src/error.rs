//! Error kinds surfaced by extraction, filtering and rendering.

use std::fmt;

/// Boxed driver error carried by [`Error::Extraction`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stage of schema extraction that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStage {
    /// Opening the database or snapshot
    Connect,
    /// Enumerating tables and views
    ListTables,
    /// Reading the columns of one table
    Columns,
    /// Reading the foreign keys of one table
    ForeignKeys,
    /// Decoding a JSON snapshot
    Snapshot,
}

impl fmt::Display for ExtractStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractStage::Connect => write!(f, "opening schema source"),
            ExtractStage::ListTables => write!(f, "getting list of tables"),
            ExtractStage::Columns => write!(f, "getting list of columns"),
            ExtractStage::ForeignKeys => write!(f, "getting list of foreign keys"),
            ExtractStage::Snapshot => write!(f, "reading schema snapshot"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid combination of settings, reported before any extraction.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{stage}{}", for_table(.table))]
    Extraction {
        stage: ExtractStage,
        table: Option<String>,
        #[source]
        source: BoxError,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn extraction(
        stage: ExtractStage,
        table: Option<&str>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Extraction {
            stage,
            table: table.map(str::to_string),
            source: source.into(),
        }
    }
}

fn for_table(table: &Option<String>) -> String {
    match table {
        Some(name) => format!(" for {name}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_message_names_stage_and_table() {
        let err = Error::extraction(ExtractStage::Columns, Some("users"), "no such table");
        assert_eq!(err.to_string(), "getting list of columns for users");

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "no such table");
    }

    #[test]
    fn test_extraction_message_without_table() {
        let err = Error::extraction(ExtractStage::ListTables, None, "disk I/O error");
        assert_eq!(err.to_string(), "getting list of tables");
    }

    #[test]
    fn test_config_message() {
        let err = Error::config("provide only one of --include or --exclude");
        assert_eq!(
            err.to_string(),
            "configuration error: provide only one of --include or --exclude"
        );
    }
}

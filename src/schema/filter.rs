//! Include/exclude name filtering applied before rendering.
//!
//! Entries are matched case-insensitively. An entry containing `*` is a
//! prefix pattern: everything before its last `*` must prefix the name.

use super::Tables;
use crate::error::{Error, Result};
use ahash::AHashSet;

/// Which list the filter was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Keep only matching tables
    Include,
    /// Drop matching tables
    Exclude,
}

/// Predicate over table names built from an include or an exclude list
#[derive(Debug, Clone)]
pub struct NameFilter {
    mode: Option<FilterMode>,
    literals: AHashSet<String>,
    prefixes: Vec<String>,
}

impl NameFilter {
    /// Build a filter. Supplying both lists is a configuration error; supplying
    /// neither yields a filter that keeps everything.
    pub fn new<S: AsRef<str>>(exclude: &[S], include: &[S]) -> Result<Self> {
        let (mode, entries) = match (exclude.is_empty(), include.is_empty()) {
            (false, false) => {
                return Err(Error::config(
                    "provide only one of --include or --exclude",
                ))
            }
            (true, true) => (None, &[][..]),
            (false, true) => (Some(FilterMode::Exclude), exclude),
            (true, false) => (Some(FilterMode::Include), include),
        };

        let mut literals = AHashSet::new();
        let mut prefixes = Vec::new();
        for entry in entries {
            let entry = entry.as_ref().to_lowercase();
            match entry.rfind('*') {
                Some(i) => prefixes.push(entry[..i].to_string()),
                None => {
                    literals.insert(entry);
                }
            }
        }

        Ok(Self {
            mode,
            literals,
            prefixes,
        })
    }

    pub fn mode(&self) -> Option<FilterMode> {
        self.mode
    }

    /// True when the filter keeps every table unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.mode.is_none()
    }

    /// Whether a table with this name survives the filter.
    pub fn keep(&self, name: &str) -> bool {
        match self.mode {
            None => true,
            Some(FilterMode::Include) => self.matches(name),
            Some(FilterMode::Exclude) => !self.matches(name),
        }
    }

    /// Narrow `tables` to the survivors, preserving their relative order.
    pub fn apply(&self, tables: Tables) -> Tables {
        if self.is_passthrough() {
            return tables;
        }

        tables.into_iter().filter(|t| self.keep(&t.name)).collect()
    }

    fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.literals.contains(&name) || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Filter `tables` by an exclude or include list.
pub fn filter<S: AsRef<str>>(tables: Tables, exclude: &[S], include: &[S]) -> Result<Tables> {
    Ok(NameFilter::new(exclude, include)?.apply(tables))
}

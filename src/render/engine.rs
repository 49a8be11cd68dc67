//! Template engine shared by the template-driven renderers.
//!
//! Built-in templates and user templates go through [`TemplateEngine::compile`];
//! the helper functions below are registered once when the engine is built.

use crate::error::{Error, Result};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// A minijinja environment with the schema helpers installed
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(auto_escape_for);

        env.add_function("fk", fk);
        env.add_function("add", add);
        env.add_function("sub", sub);

        Self { env }
    }

    /// Compile `source` under `name`. Syntax errors are reported here, before
    /// anything is rendered.
    pub fn compile(&mut self, name: &str, source: impl Into<String>) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source.into())
            .map_err(Error::Template)
    }

    /// Read and compile a template file, registered under its file name.
    pub fn compile_file(&mut self, path: &Path) -> Result<String> {
        let source = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read template {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("template")
            .to_string();

        self.compile(&name, source)?;
        Ok(name)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Execute a compiled template, streaming into `out`.
    pub fn render_to<S: Serialize, W: Write>(&self, name: &str, ctx: S, out: W) -> Result<()> {
        let template = self.env.get_template(name)?;
        template.render_to_write(ctx, out).map_err(|e| {
            if e.kind() == ErrorKind::WriteFailure {
                Error::Output(io::Error::other(e))
            } else {
                Error::Template(e)
            }
        })?;
        Ok(())
    }

    /// Execute a compiled template into a string.
    pub fn render_to_string<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

/// HTML escaping for markup targets, none for everything else.
fn auto_escape_for(name: &str) -> AutoEscape {
    let ext = name.rsplit('.').next().unwrap_or_default();
    match ext.to_lowercase().as_str() {
        "html" | "htm" | "xml" | "dot" | "gv" => AutoEscape::Html,
        _ => AutoEscape::None,
    }
}

/// `to_table.to_column` of the first reference leaving `column`, or an empty
/// string.
fn fk(table: &Value, column: &Value) -> std::result::Result<String, minijinja::Error> {
    let references = table.get_attr("references")?;
    if references.is_undefined() || references.is_none() {
        return Ok(String::new());
    }

    let name = column.get_attr("name")?;
    for r in references.try_iter()? {
        if r.get_attr("from_column")? == name {
            return Ok(format!(
                "{}.{}",
                r.get_attr("to_table")?,
                r.get_attr("to_column")?
            ));
        }
    }
    Ok(String::new())
}

fn add(x: i64, y: i64) -> i64 {
    x + y
}

fn sub(x: i64, y: i64) -> i64 {
    x - y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ForeignKey, Table};
    use minijinja::context;

    fn orders() -> Table {
        Table::new("orders")
            .with_column(Column::new("id", "INTEGER").primary_key())
            .with_column(Column::new("user_id", "INTEGER"))
            .with_reference(ForeignKey::new("user_id", "users", "id"))
    }

    #[test]
    fn test_fk_helper() {
        let mut engine = TemplateEngine::new();
        engine
            .compile(
                "t.txt",
                "{% for c in table.columns %}[{{ fk(table, c) }}]{% endfor %}",
            )
            .unwrap();

        let out = engine
            .render_to_string("t.txt", context! { table => orders() })
            .unwrap();
        assert_eq!(out, "[][users.id]");
    }

    #[test]
    fn test_fk_helper_first_match_and_plain_maps() {
        let table = Table::new("line")
            .with_column(Column::new("order_ref", "INTEGER"))
            .with_reference(ForeignKey::new("order_ref", "orders", "id").with_sequence(1))
            .with_reference(ForeignKey::new("order_ref", "orders", "rev").with_sequence(2));

        let mut engine = TemplateEngine::new();
        engine
            .compile("t.txt", "[{{ fk(table, table.columns[0]) }}][{{ fk(bare, col) }}]")
            .unwrap();

        let out = engine
            .render_to_string(
                "t.txt",
                context! {
                    table => table,
                    bare => context! { name => "t" },
                    col => context! { name => "c" },
                },
            )
            .unwrap();
        assert_eq!(out, "[orders.id][]");
    }

    #[test]
    fn test_fk_helper_on_wide_table() {
        let mut table = Table::new("wide");
        for i in 0..500 {
            table = table.with_column(Column::new(format!("c{}", i), "INTEGER"));
        }
        let table = table.with_reference(ForeignKey::new("c499", "other", "id"));

        let mut engine = TemplateEngine::new();
        engine
            .compile(
                "t.txt",
                "{% for c in table.columns %}{{ fk(table, c) }}{% endfor %}",
            )
            .unwrap();

        let out = engine
            .render_to_string("t.txt", context! { table => table })
            .unwrap();
        assert_eq!(out, "other.id");
    }

    #[test]
    fn test_arithmetic_helpers() {
        let mut engine = TemplateEngine::new();
        engine
            .compile("t.txt", "{{ add(2, 3) }} {{ sub(10, 3) }}")
            .unwrap();
        assert_eq!(engine.render_to_string("t.txt", ()).unwrap(), "5 7");
    }

    #[test]
    fn test_syntax_error_fails_compile() {
        let mut engine = TemplateEngine::new();
        let err = engine.compile("bad.txt", "{% for x in %}").unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert!(!engine.has_template("bad.txt"));
    }

    #[test]
    fn test_missing_field_is_runtime_error() {
        let mut engine = TemplateEngine::new();
        engine.compile("t.txt", "{{ table.nope.deeper }}").unwrap();
        let err = engine
            .render_to_string("t.txt", context! { table => orders() })
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_auto_escape_by_extension() {
        let mut engine = TemplateEngine::new();
        engine.compile("a.html", "{{ v }}").unwrap();
        engine.compile("a.md", "{{ v }}").unwrap();

        let html = engine.render_to_string("a.html", context! { v => "<b>" }).unwrap();
        let md = engine.render_to_string("a.md", context! { v => "<b>" }).unwrap();
        assert_eq!(html, "&lt;b&gt;");
        assert_eq!(md, "<b>");
    }

    #[test]
    fn test_compile_file_registers_under_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        fs::write(&path, "{% for t in tables %}{{ t.name }};{% endfor %}").unwrap();

        let mut engine = TemplateEngine::new();
        let name = engine.compile_file(&path).unwrap();
        assert_eq!(name, "names.txt");

        let out = engine
            .render_to_string(&name, context! { tables => vec![orders()] })
            .unwrap();
        assert_eq!(out, "orders;");
    }
}

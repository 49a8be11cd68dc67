//! Markdown reference tables, one section per table.

use super::engine::TemplateEngine;
use super::Section;
use crate::error::Result;
use crate::schema::Tables;
use minijinja::context;
use std::io::{BufWriter, Write};

pub(crate) const TEMPLATE_NAME: &str = "schema.md";

pub(crate) const TEMPLATE: &str = r#"{% for t in tables %}
{{ heading }} {{ t.name }}

| Column | Type | Default | Refers |
| ------ | ---- | ------- | ------ |
{% for c in t.columns %}
| {{ c.name }}{% if c.primary_key %} (pk){% endif %} | {{ c.type }} | {% if c.default is not none %}{{ c.default }}{% endif %}{% if not c.not_null %} (nullable){% endif %} | {{ fk(t, c) }} |
{% endfor %}

{% endfor %}
"#;

pub fn write_markdown<W: Write>(
    out: W,
    engine: &TemplateEngine,
    mut tables: Tables,
    section: Section,
) -> Result<()> {
    tables.sort_by_name();
    let mut w = BufWriter::new(out);

    engine.render_to(
        TEMPLATE_NAME,
        context! {
            tables => &tables,
            section => section.level(),
            heading => section.markdown_marker(),
        },
        &mut w,
    )?;

    w.flush()?;
    Ok(())
}

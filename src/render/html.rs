//! HTML reference tables, one `<hN>` section per table.

use super::engine::TemplateEngine;
use super::Section;
use crate::error::Result;
use crate::schema::Tables;
use minijinja::context;
use std::io::{BufWriter, Write};

pub(crate) const TEMPLATE_NAME: &str = "schema.html";

pub(crate) const TEMPLATE: &str = r#"{% for t in tables %}
<h{{ section }}>{{ t.name }}</h{{ section }}>
<table>
<thead>
    <tr>
        <th>Column</th>
        <th>Type</th>
        <th>Default</th>
        <th>Refers</th>
    </tr>
</thead>
<tbody>
{% for c in t.columns %}
    <tr>
        <td>{{ c.name }}{% if c.primary_key %} (pk){% endif %}</td>
        <td>{{ c.type }}</td>
        <td>{% if c.default is not none %}{{ c.default }}{% endif %}{% if not c.not_null %} (nullable){% endif %}</td>
        <td>{{ fk(t, c) }}</td>
    </tr>
{% endfor %}
</tbody>
</table>
{% endfor %}
"#;

pub fn write_html<W: Write>(
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
        },
        &mut w,
    )?;

    w.flush()?;
    Ok(())
}

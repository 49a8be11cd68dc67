//! Graphviz DOT format output.
//!
//! Every table is a `shape=plain` node labelled with an HTML-like table. Each
//! column row exposes two ports, `e<i>` where edges enter and `s<i>` where they
//! leave, `i` being the column position before truncation.

use super::engine::TemplateEngine;
use crate::error::Result;
use crate::schema::Tables;
use minijinja::context;
use std::io::{BufWriter, Write};

pub(crate) const TEMPLATE_NAME: &str = "graphviz.dot";

pub(crate) const TEMPLATE: &str = r#"<font point-size="12">
<table{% if table.kind == "view" %} style="rounded"{% endif %} border="1" cellpadding="2" cellborder="0" cellspacing="0">
   <tr>
      <td{% if fk_mode %} colspan="3"{% endif %}>{{ table.name }}</td>
   </tr>
   <HR/>
{% for col in table.columns %}
{% if truncate <= 0 or loop.index0 < truncate %}
   <tr>
      <td align="left" port="e{{ loop.index0 }}">{{ col.name }}</td>
      <td align="left"{% if not fk_mode %} port="s{{ loop.index0 }}"{% endif %}>{% if col.type %}<font point-size="10">{{ col.type }}</font>{% endif %}</td>
{% if fk_mode %}
      <td align="left" port="s{{ loop.index0 }}"><font point-size="10">{{ fk(table, col) or " " }}</font></td>
{% endif %}
   </tr>
{% elif loop.index0 == truncate %}
   <tr>
      <td colspan="3"><font point-size="10"><i>{{ sub(table.columns|length, truncate) }} other column(s) omitted</i></font></td>
   </tr>
{% endif %}
{% endfor %}
</table>
</font>
"#;

/// Write a Graphviz digraph for `tables`.
///
/// With `fk` set every node gains a third column showing the referenced
/// `table.column`. With `truncate > 0` tables longer than `truncate` columns
/// show only the first `truncate` rows and a summary row.
pub fn write_dot<W: Write>(
    out: W,
    engine: &TemplateEngine,
    mut tables: Tables,
    fk: bool,
    truncate: i64,
) -> Result<()> {
    tables.sort_by_name();
    let mut w = BufWriter::new(out);

    w.write_all(b"digraph g {\n")?;
    w.write_all(b"rankdir=LR;\n")?;
    w.write_all(b"edge [ arrowsize=0.5, arrowtail=empty, arrowhead=empty ];\n")?;
    w.write_all(b"node [ shape=plain, height=0.1 ];\n")?;
    w.write_all(b"fontsize=\"10pt\"\n")?;

    for (i, table) in tables.iter().enumerate() {
        write!(w, "table{} [label=<", i)?;
        engine.render_to(
            TEMPLATE_NAME,
            context! { table => table, fk_mode => fk, truncate => truncate },
            &mut w,
        )?;
        w.write_all(b">]\n")?;
    }

    for (i, table) in tables.iter().enumerate() {
        for r in &table.references {
            let Some((j, dest)) = tables.table(&r.to_table) else {
                continue;
            };
            let src_port = port_index(table.column(&r.from_column).map(|(k, _)| k));
            let dest_port = port_index(dest.column(&r.to_column).map(|(k, _)| k));

            writeln!(w, "table{}:s{} -> table{}:e{};", i, src_port, j, dest_port)?;
        }
    }

    w.write_all(b"}\n")?;
    w.flush()?;
    Ok(())
}

/// Unknown columns keep the historical `-1` port so the edge still lands on
/// the node.
fn port_index(position: Option<usize>) -> i64 {
    position.map(|p| p as i64).unwrap_or(-1)
}

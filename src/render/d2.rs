//! D2 diagram output using `sql_table` shapes.

use crate::error::Result;
use crate::schema::{Table, Tables};
use std::io::{BufWriter, Write};

/// Write one `sql_table` block per table, then one connection per foreign key
/// whose target table is present.
pub fn write_d2<W: Write>(out: W, mut tables: Tables) -> Result<()> {
    tables.sort_by_name();
    let mut w = BufWriter::new(out);

    for table in &tables {
        write_table(&mut w, table)?;
    }

    for table in &tables {
        for r in &table.references {
            if tables.table(&r.to_table).is_none() {
                continue;
            }
            writeln!(
                w,
                "{}.{} -> {}.{}",
                table.name, r.from_column, r.to_table, r.to_column
            )?;
        }
    }

    w.flush()?;
    Ok(())
}

fn write_table<W: Write>(w: &mut W, table: &Table) -> Result<()> {
    writeln!(w, "{}: {{", table.name)?;
    writeln!(w, "   shape: sql_table")?;
    writeln!(w)?;

    for col in &table.columns {
        write!(w, "   {}: {}", col.name, col.col_type)?;

        if let Some(default) = &col.default {
            write!(w, " {}", default)?;
        }
        if !col.not_null {
            w.write_all(b" (nullable)")?;
        }
        if col.primary_key {
            w.write_all(b" { constraint: primary_key }")?;
        }
        if table.refers(&col.name).is_some() {
            w.write_all(b" { constraint: foreign_key }")?;
        }
        writeln!(w)?;
    }

    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

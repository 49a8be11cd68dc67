//! User-supplied templates.
//!
//! The template sees the filtered tables in source order as `tables`, plus the
//! `section`, `fk_mode` and `truncate` settings, and the `fk`, `add` and `sub`
//! helpers.

use super::engine::TemplateEngine;
use super::RenderOptions;
use crate::error::Result;
use crate::schema::Tables;
use minijinja::context;
use std::io::{BufWriter, Write};

pub fn write_custom<W: Write>(
    out: W,
    engine: &TemplateEngine,
    name: &str,
    tables: &Tables,
    options: &RenderOptions,
) -> Result<()> {
    let mut w = BufWriter::new(out);

    engine.render_to(
        name,
        context! {
            tables => tables,
            section => options.section.level(),
            fk_mode => options.fk,
            truncate => options.truncate,
        },
        &mut w,
    )?;

    w.flush()?;
    Ok(())
}

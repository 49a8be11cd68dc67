//! JSON snapshot output. The snapshot source reads this format back.

use crate::error::Result;
use crate::schema::Tables;
use std::io::{self, BufWriter, Write};

pub fn write_json<W: Write>(out: W, mut tables: Tables) -> Result<()> {
    tables.sort_by_name();
    let mut w = BufWriter::new(out);

    serde_json::to_writer_pretty(&mut w, &tables).map_err(io::Error::from)?;
    w.write_all(b"\n")?;

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_tables;
    use crate::schema::DefaultValue;

    #[test]
    fn test_json_round_trips_model() {
        let mut out = Vec::new();
        write_json(&mut out, sample_tables()).unwrap();

        let back: Tables = serde_json::from_slice(&out).unwrap();
        assert_eq!(back, sample_tables().sorted());
        assert_eq!(
            back.table("users").unwrap().1.columns[2].default,
            Some(DefaultValue::Text("anon".to_string()))
        );
    }

    #[test]
    fn test_json_field_names() {
        let mut out = Vec::new();
        write_json(&mut out, sample_tables()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\"type\": \"INTEGER\""));
        assert!(text.contains("\"from_column\": \"user_id\""));
        assert!(text.contains("\"kind\": \"table\""));
    }
}

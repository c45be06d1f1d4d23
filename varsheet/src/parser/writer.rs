//! Canonical comma-delimited output.

use std::io::Write;

use crate::models::{ColumnNames, ValidatedRow};

/// Write `rows` as comma-delimited text under the canonical header.
///
/// Fields are quoted only when necessary and records end with `\n`.
pub fn write_table<W: Write>(
    out: W,
    columns: &ColumnNames,
    rows: &[ValidatedRow],
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(columns.header())?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;

    Ok(())
}

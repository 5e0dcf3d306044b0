use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use std::{fs::File, path::Path};

use crate::error::Cause;

/// Write `table` as comma-separated text with a header line; nulls become
/// empty fields.
pub fn write_csv(table: &RecordBatch, destination: &Path) -> Result<(), Cause> {
    let file = File::create(destination)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(table)?;
    Ok(())
}

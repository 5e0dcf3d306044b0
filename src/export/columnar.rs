use arrow::record_batch::RecordBatch;
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::Path,
};

use crate::error::Cause;

/// Write `table` as a single Brotli-compressed Parquet file and return the
/// size on disk.
pub fn write_parquet(table: &RecordBatch, destination: &Path) -> Result<u64, Cause> {
    let file = File::create(destination)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(file, table.schema(), Some(props))?;
    writer.write(table)?;
    writer.close()?;

    Ok(fs::metadata(destination)?.len())
}

// src/export/mod.rs
pub mod columnar;
pub mod delimited;
pub mod xlsx;

use arrow::{array::Array, error::ArrowError, record_batch::RecordBatch};
use std::path::Path;
use tracing::{debug, error};

use crate::error::{Cause, ReportError, Result};

/// Output encodings, picked from the destination's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Parquet,
    Csv,
}

impl ExportFormat {
    /// `xlsx` (or no extension), `parquet` and `csv`, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Some(Self::Xlsx),
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Some(Self::Xlsx),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Some(Self::Parquet),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(Self::Csv),
            Some(_) => None,
        }
    }
}

/// Drop every column whose values are all null. With zero rows every column
/// counts as all-null.
pub fn drop_all_null_columns(table: &RecordBatch) -> std::result::Result<RecordBatch, ArrowError> {
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, array)| {
            let nulls = array.logical_nulls().map_or(0, |n| n.null_count());
            nulls < array.len()
        })
        .map(|(idx, _)| idx)
        .collect();
    table.project(&keep)
}

/// Write `table` to `destination`, minus its all-null columns.
///
/// Creates or overwrites the file. A failure part-way through can leave a
/// partially written file behind.
#[tracing::instrument(level = "info", skip_all, fields(destination = %destination.display()))]
pub fn export_table(table: &RecordBatch, destination: &Path) -> Result<()> {
    match write_table(table, destination) {
        Ok(written) => {
            debug!(
                rows = written.num_rows(),
                columns = written.num_columns(),
                dropped = table.num_columns() - written.num_columns(),
                "file exported successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(
                "an error occurred while exporting table: {} with export_path: {}",
                e,
                destination.display()
            );
            Err(ReportError::export(destination, e))
        }
    }
}

fn write_table(table: &RecordBatch, destination: &Path) -> std::result::Result<RecordBatch, Cause> {
    let format = ExportFormat::from_path(destination).ok_or_else(|| {
        format!(
            "unsupported output extension for {} (expected xlsx, parquet or csv)",
            destination.display()
        )
    })?;

    let cleaned = drop_all_null_columns(table)?;
    match format {
        ExportFormat::Xlsx => xlsx::write_xlsx(&cleaned, destination)?,
        ExportFormat::Parquet => {
            columnar::write_parquet(&cleaned, destination)?;
        }
        ExportFormat::Csv => delimited::write_csv(&cleaned, destination)?,
    }
    Ok(cleaned)
}

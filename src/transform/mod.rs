//! Table-to-table stages. Each one takes ownership of a batch and hands back a
//! new one; Arrow arrays are reference counted, so untouched columns are
//! shared rather than copied.

pub mod concat;
pub mod derive;
pub mod rename;

use arrow::record_batch::RecordBatch;

pub use concat::concat_tables;
pub use derive::{derive_status, DeriveOptions, ORIGINAL_VALUES_COLUMN};
pub use rename::{rename_columns, ColumnMapping};

/// Column names of `batch`, in order.
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

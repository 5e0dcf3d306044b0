use arrow::{
    array::{new_null_array, Array, ArrayRef},
    compute::concat,
    datatypes::{Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{ReportError, Result};

/// Stack `tables` vertically, aligning columns by name.
///
/// The output has the union of all column names in first-seen order; a table
/// lacking a column contributes nulls for it. Rows keep their order: all rows
/// of the first table, then the second, and so on.
pub fn concat_tables(tables: &[RecordBatch]) -> Result<RecordBatch> {
    match stack(tables) {
        Ok(batch) => {
            debug!(
                tables = tables.len(),
                rows = batch.num_rows(),
                columns = batch.num_columns(),
                "tables concatenated"
            );
            Ok(batch)
        }
        Err(e) => {
            error!("failed to concatenate {} tables: {}", tables.len(), e);
            Err(ReportError::Aggregation {
                tables: tables.len(),
                source: Box::new(e),
            })
        }
    }
}

fn stack(tables: &[RecordBatch]) -> std::result::Result<RecordBatch, ArrowError> {
    let mut fields: Vec<Field> = Vec::new();
    for table in tables {
        for field in table.schema().fields() {
            if !fields.iter().any(|f| f.name() == field.name()) {
                fields.push(Field::new(field.name(), field.data_type().clone(), true));
            }
        }
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.len());
    for field in &fields {
        let parts: Vec<ArrayRef> = tables
            .iter()
            .map(|table| match table.schema().index_of(field.name()) {
                Ok(idx) => Arc::clone(table.column(idx)),
                Err(_) => new_null_array(field.data_type(), table.num_rows()),
            })
            .collect();
        let refs: Vec<&dyn Array> = parts.iter().map(|a| a.as_ref()).collect();
        columns.push(concat(&refs)?);
    }

    let rows = tables.iter().map(RecordBatch::num_rows).sum();
    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &RecordBatchOptions::new().with_row_count(Some(rows)),
    )
}

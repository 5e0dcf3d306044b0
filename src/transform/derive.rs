use arrow::{
    array::{Array, ArrayRef, StringArray},
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use super::column_names;
use crate::error::{ReportError, Result};

/// Label of the column that keeps the source values as they were before
/// derivation.
pub const ORIGINAL_VALUES_COLUMN: &str = "Services on port";

/// Parameters of [`derive_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeriveOptions {
    /// Column whose presence/absence is turned into a status.
    pub source_column: String,
    /// Written where the source value was present.
    pub present_label: String,
    /// Written where the source value was null.
    pub absent_label: String,
    /// Column receiving the untouched source values.
    pub original_column: String,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            source_column: "encapsulation".into(),
            present_label: "No".into(),
            absent_label: "Yes".into(),
            original_column: ORIGINAL_VALUES_COLUMN.into(),
        }
    }
}

/// Replace `source_column` with a status column and keep its original values
/// in `original_column`.
///
/// The original values are captured first and the status is computed from that
/// capture, never from a partially rewritten column. `original_column` is
/// appended, or replaced in place if the table already has it.
#[tracing::instrument(level = "debug", skip_all, fields(column = %options.source_column))]
pub fn derive_status(table: RecordBatch, options: &DeriveOptions) -> Result<RecordBatch> {
    let schema = table.schema();
    let Some(source_idx) = schema
        .fields()
        .iter()
        .position(|f| f.name() == &options.source_column)
    else {
        let available = column_names(&table);
        error!(
            "column `{}` not found while populating status column. Inputs: present_label: {}, absent_label: {}, columns: {:?}",
            options.source_column, options.present_label, options.absent_label, available
        );
        return Err(ReportError::ColumnNotFound {
            column: options.source_column.clone(),
            available,
        });
    };

    // 1) snapshot
    let snapshot: ArrayRef = Arc::clone(table.column(source_idx));

    // 2) status from the snapshot
    let status: StringArray = (0..snapshot.len())
        .map(|i| {
            Some(if snapshot.is_null(i) {
                options.absent_label.as_str()
            } else {
                options.present_label.as_str()
            })
        })
        .collect();

    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = table.columns().to_vec();

    let original_field = Arc::new(Field::new(
        &options.original_column,
        snapshot.data_type().clone(),
        true,
    ));
    match fields
        .iter()
        .position(|f| f.name() == &options.original_column)
    {
        Some(idx) => {
            fields[idx] = original_field;
            columns[idx] = Arc::clone(&snapshot);
        }
        None => {
            fields.push(original_field);
            columns.push(Arc::clone(&snapshot));
        }
    }

    fields[source_idx] = Arc::new(Field::new(&options.source_column, DataType::Utf8, true));
    columns[source_idx] = Arc::new(status);

    let rows = table.num_rows();
    let derived = RecordBatch::try_new(
        Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone())),
        columns,
    )
    .map_err(|e| {
        error!(
            "failed to assemble derived table: {}. Inputs: column: {}, present_label: {}, absent_label: {}",
            e, options.source_column, options.present_label, options.absent_label
        );
        ReportError::Derivation {
            column: options.source_column.clone(),
            source: Box::new(e),
        }
    })?;

    debug!(
        rows,
        absent = snapshot.null_count(),
        "status column populated"
    );
    Ok(derived)
}

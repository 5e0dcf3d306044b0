use arrow::{
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    sync::Arc,
};
use tracing::{debug, error};

use super::column_names;
use crate::error::{ReportError, Result};

/// Old column name → new column name.
///
/// All pairs apply at once, so `{a: b, b: a}` swaps two columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> Option<String> {
        self.0.insert(old.into(), new.into())
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.0.get(old).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject pairs with an empty old or new name.
    pub fn validate(&self) -> Result<()> {
        let empty: Vec<String> = self
            .iter()
            .filter(|(old, new)| old.trim().is_empty() || new.trim().is_empty())
            .map(|(old, new)| format!("{old:?} -> {new:?}"))
            .collect();
        if empty.is_empty() {
            Ok(())
        } else {
            Err(ReportError::invalid_argument(format!(
                "column mapping has empty names: {}",
                empty.join(", ")
            )))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Rename the columns of `table` according to `mapping`.
///
/// Every key must name an existing column and the result must not contain
/// two columns with the same name. Both checks run before anything is built,
/// so on failure nothing is renamed. Renamed columns keep their
/// position and data.
#[tracing::instrument(level = "debug", skip_all, fields(pairs = mapping.len()))]
pub fn rename_columns(table: RecordBatch, mapping: &ColumnMapping) -> Result<RecordBatch> {
    let columns = column_names(&table);

    if let Err(e) = mapping.validate() {
        error!(
            "failed to rename columns: {}. Inputs: columns: {:?}, columns_map: {:?}",
            e, columns, mapping
        );
        return Err(e);
    }

    let unknown: Vec<String> = mapping
        .iter()
        .filter(|(old, _)| !columns.iter().any(|c| c == old))
        .map(|(old, _)| old.to_string())
        .collect();
    if !unknown.is_empty() {
        error!(
            "failed to rename columns: unknown keys {:?}. Inputs: columns: {:?}, columns_map: {:?}",
            unknown, columns, mapping
        );
        return Err(ReportError::UnknownColumn { columns: unknown });
    }

    let mut seen = HashSet::new();
    let clashes: BTreeSet<&str> = columns
        .iter()
        .map(|c| mapping.get(c).unwrap_or(c.as_str()))
        .filter(|name| !seen.insert(*name))
        .collect();
    if !clashes.is_empty() {
        let e = ReportError::invalid_argument(format!(
            "rename would leave duplicate column names: {clashes:?}"
        ));
        error!(
            "failed to rename columns: {}. Inputs: columns: {:?}, columns_map: {:?}",
            e, columns, mapping
        );
        return Err(e);
    }

    let schema = table.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| match mapping.get(f.name()) {
            Some(new) => f.as_ref().clone().with_name(new),
            None => f.as_ref().clone(),
        })
        .collect();

    let renamed = RecordBatch::try_new(
        Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone())),
        table.columns().to_vec(),
    )
    .map_err(|e| {
        error!(
            "failed to rename columns: {}. Inputs: columns: {:?}, columns_map: {:?}",
            e, columns, mapping
        );
        ReportError::Rename {
            source: Box::new(e),
        }
    })?;

    debug!("columns renamed successfully");
    Ok(renamed)
}

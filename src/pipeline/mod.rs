// src/pipeline/mod.rs
pub mod discover;

use arrow::record_batch::RecordBatch;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{error, info, warn};

use crate::{
    config::{OnFileError, ReportConfig},
    error::Result,
    export::export_table,
    extract::extract_table,
    transform::{column_names, concat_tables, derive_status, rename_columns},
};
pub use discover::{discover_inputs, timestamped_output_path, OUTPUT_STAMP_FORMAT};

/// Outcome of one [`run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub destination: PathBuf,
    /// Files whose rows made it into the report, in report order.
    pub processed: Vec<PathBuf>,
    /// Files left out under [`OnFileError::Skip`].
    pub skipped: Vec<PathBuf>,
    pub rows: usize,
    /// Columns of the aggregated table, before all-null columns are dropped.
    pub columns: Vec<String>,
}

/// Extract, derive and rename one input file.
#[tracing::instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn process_file(path: &Path, config: &ReportConfig) -> Result<RecordBatch> {
    let table = extract_table(path, &config.xpath, &config.columns)?;
    let table = derive_status(table, &config.derive)?;
    rename_columns(table, &config.column_map)
}

/// Process every input file in `config.input_dir` one after another,
/// stack the results and export them once to `destination`.
pub fn run(config: &ReportConfig, destination: &Path) -> Result<RunSummary> {
    let start = Instant::now();
    let inputs = discover_inputs(&config.input_dir, &config.extensions)?;
    if inputs.is_empty() {
        warn!(dir = %config.input_dir.display(), "no input files found");
    }
    info!("{} input files to process", inputs.len());

    let mut tables = Vec::with_capacity(inputs.len());
    let mut processed = Vec::with_capacity(inputs.len());
    let mut skipped = Vec::new();
    for path in inputs {
        match process_file(&path, config) {
            Ok(table) => {
                info!(path = %path.display(), rows = table.num_rows(), "processed");
                tables.push(table);
                processed.push(path);
            }
            Err(e) => match config.on_file_error {
                OnFileError::Abort => {
                    error!("processing {} failed, aborting: {}", path.display(), e);
                    return Err(e);
                }
                OnFileError::Skip => {
                    warn!("processing {} failed, skipping: {}", path.display(), e);
                    skipped.push(path);
                }
            },
        }
    }

    let report = concat_tables(&tables)?;
    export_table(&report, destination)?;

    info!(
        destination = %destination.display(),
        rows = report.num_rows(),
        elapsed = ?start.elapsed(),
        "report written"
    );
    Ok(RunSummary {
        destination: destination.to_path_buf(),
        processed,
        skipped,
        rows: report.num_rows(),
        columns: column_names(&report),
    })
}

use chrono::NaiveDateTime;
use glob::{glob, Pattern};
use std::{
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

/// `strftime` layout of report file stems, e.g. `18-10-2026-14-05-09`.
pub const OUTPUT_STAMP_FORMAT: &str = "%d-%m-%Y-%H-%M-%S";

/// List the regular files directly inside `dir` whose extension is one of
/// `extensions` (case-insensitive), sorted by path so row order is stable
/// between runs.
pub fn discover_inputs(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReportError::io(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "input directory does not exist"),
        ));
    }

    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let entries = glob(&pattern)
        .map_err(|e| ReportError::config(format!("invalid glob pattern `{pattern}`: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot read directory entry: {}", e);
                continue;
            }
        };
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "input files discovered");
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// `dir/<dd-mm-YYYY-HH-MM-SS>.<extension>`
pub fn timestamped_output_path(dir: &Path, now: NaiveDateTime, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", now.format(OUTPUT_STAMP_FORMAT), extension))
}

//! Static run parameters. Defaults reproduce the stock Junos interface report;
//! any subset can be overridden from a YAML file.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

use crate::{
    error::{ReportError, Result},
    extract::XPathQuery,
    export::ExportFormat,
    transform::{ColumnMapping, DeriveOptions},
};

pub const DEFAULT_XPATH: &str = "/configuration/interfaces/interface";

/// What the orchestrator does when one input file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnFileError {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the error, leave the file out of the report and carry on.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Folder scanned for configuration files.
    pub input_dir: PathBuf,
    /// Folder receiving the timestamped report.
    pub output_dir: PathBuf,
    /// File extensions picked up from `input_dir`, without the dot.
    pub extensions: Vec<String>,
    /// Extension of the report; selects the output format.
    pub output_extension: String,
    pub xpath: String,
    /// Columns to extract, in report order.
    pub columns: Vec<String>,
    pub column_map: ColumnMapping,
    pub derive: DeriveOptions,
    pub on_file_error: OnFileError,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            extensions: vec!["xml".into(), "txt".into()],
            output_extension: "xlsx".into(),
            xpath: DEFAULT_XPATH.into(),
            columns: vec!["name".into(), "description".into(), "encapsulation".into()],
            column_map: [
                ("description", "Device Name"),
                ("name", "Port ID"),
                ("encapsulation", "Is the port available?"),
            ]
            .into_iter()
            .collect(),
            derive: DeriveOptions::default(),
            on_file_error: OnFileError::Abort,
        }
    }
}

impl ReportConfig {
    /// Load a YAML file; keys it leaves out keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let config = Self::from_yaml_str(&text).inspect_err(|e| {
            error!(path = %path.display(), "failed to load config: {}", e);
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| ReportError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        XPathQuery::compile(&self.xpath)
            .map_err(|e| ReportError::config(format!("xpath: {e}")))?;
        if self.extensions.is_empty() {
            return Err(ReportError::config("extensions must not be empty"));
        }
        let sample = PathBuf::from(format!("report.{}", self.output_extension));
        if ExportFormat::from_path(&sample).is_none() {
            return Err(ReportError::config(format!(
                "unsupported output_extension `{}`",
                self.output_extension
            )));
        }
        if self.derive.source_column.trim().is_empty() {
            return Err(ReportError::config("derive.source_column must not be empty"));
        }
        self.column_map
            .validate()
            .map_err(|e| ReportError::config(e.to_string()))
    }
}

//! Error types for the report pipeline.
//!
//! Library code returns [`ReportError`] via `thiserror`; the binaries wrap it
//! with `anyhow` for top-level context.

use std::path::PathBuf;

/// Boxed cause kept as the `source` of wrapping variants.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The input path does not resolve to an existing file.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Reading, parsing or querying an input document failed.
    #[error("failed to extract `{query}` from {}: {source}", .path.display())]
    Extraction {
        path: PathBuf,
        query: String,
        #[source]
        source: Cause,
    },

    /// A column the caller relies on is missing from the table.
    #[error("column `{column}` not found in table (columns: {available:?})")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("failed to derive status from column `{column}`: {source}")]
    Derivation {
        column: String,
        #[source]
        source: Cause,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Rename mapping keys that are not columns of the table.
    #[error("unknown column(s) in rename mapping: {columns:?}")]
    UnknownColumn { columns: Vec<String> },

    #[error("failed to rename columns: {source}")]
    Rename {
        #[source]
        source: Cause,
    },

    #[error("failed to concatenate {tables} table(s): {source}")]
    Aggregation {
        tables: usize,
        #[source]
        source: Cause,
    },

    #[error("failed to export table to {}: {source}", .destination.display())]
    Export {
        destination: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub fn extraction(
        path: impl Into<PathBuf>,
        query: impl Into<String>,
        source: impl Into<Cause>,
    ) -> Self {
        Self::Extraction {
            path: path.into(),
            query: query.into(),
            source: source.into(),
        }
    }

    pub fn export(destination: impl Into<PathBuf>, source: impl Into<Cause>) -> Self {
        Self::Export {
            destination: destination.into(),
            source: source.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Turn a folder of XML network-configuration files into one spreadsheet of
//! interfaces.
//!
//! Each file goes through [`extract::extract_table`],
//! [`transform::derive_status`] and [`transform::rename_columns`]; the
//! per-file tables are stacked with [`transform::concat_tables`] and written
//! once by [`export::export_table`]. [`pipeline::run`] wires it together.

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ReportConfig;
pub use error::{ReportError, Result};

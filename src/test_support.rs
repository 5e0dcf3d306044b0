// Shared helpers for the in-crate unit tests.

use arrow::{
    array::{ArrayRef, AsArray, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub use crate::transform::column_names;

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,portreport=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A Junos-style `<configuration>` document with one `<interface>` per entry
/// of `(name, description, encapsulation)`.
pub fn interfaces_xml(interfaces: &[(&str, Option<&str>, Option<&str>)]) -> String {
    let mut xml = String::from("<configuration>\n  <interfaces>\n");
    for (name, description, encapsulation) in interfaces {
        xml.push_str("    <interface>\n");
        xml.push_str(&format!("      <name>{name}</name>\n"));
        if let Some(d) = description {
            xml.push_str(&format!("      <description>{d}</description>\n"));
        }
        if let Some(e) = encapsulation {
            xml.push_str(&format!("      <encapsulation>{e}</encapsulation>\n"));
        }
        xml.push_str("    </interface>\n");
    }
    xml.push_str("  </interfaces>\n</configuration>\n");
    xml
}

/// A batch of nullable string columns, in the given order.
pub fn strings_batch(columns: &[(&str, Vec<Option<&str>>)]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

pub fn string_column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let idx = batch.schema().index_of(name).unwrap();
    batch
        .column(idx)
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

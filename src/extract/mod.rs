// src/extract/mod.rs
pub mod query;
pub mod tree;

use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use roxmltree::ParsingOptions;
use sxd_document::dom::{ChildOfElement, Element};
use std::{collections::HashMap, fs, path::Path, sync::Arc};
use tracing::{debug, error};

use crate::error::{ReportError, Result};
pub use query::{QueryError, XPathQuery};

/// Underlying causes carried by [`ReportError::Extraction`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("reading file: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    #[error("query matched no elements")]
    NoMatches,
    #[error("requested columns not present in document: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("building table: {0}")]
    Arrow(#[from] ArrowError),
}

/// Rows pulled out of the matched elements, before column selection.
#[derive(Debug, Default)]
struct RawRecords {
    /// Column names in first-seen order across all rows.
    headers: Vec<String>,
    /// One map per matched element; a `None` value is an empty element.
    rows: Vec<HashMap<String, Option<String>>>,
}

impl RawRecords {
    fn from_elements(elements: &[Element]) -> Self {
        let mut records = RawRecords::default();
        for element in elements {
            let mut row = HashMap::new();

            for attr in element.attributes() {
                records.set(&mut row, attr.name().local_part(), Some(attr.value()));
            }
            let own = leading_text(element);
            if let Some(text) = cell(own.as_deref()) {
                records.set(&mut row, element.name().local_part(), Some(text));
            }
            for child in element.children() {
                if let ChildOfElement::Element(child) = child {
                    let text = leading_text(&child);
                    records.set(&mut row, child.name().local_part(), text.as_deref());
                }
            }

            records.rows.push(row);
        }
        records
    }

    fn set(&mut self, row: &mut HashMap<String, Option<String>>, name: &str, value: Option<&str>) {
        if !self.headers.iter().any(|h| h == name) {
            self.headers.push(name.to_string());
        }
        // a repeated tag overwrites the earlier value
        row.insert(name.to_string(), cell(value).map(str::to_string));
    }

    fn into_batch(self, columns: &[String]) -> std::result::Result<RecordBatch, ExtractError> {
        let selected: Vec<String> = if columns.is_empty() {
            self.headers.clone()
        } else {
            let missing: Vec<String> = columns
                .iter()
                .filter(|c| !self.headers.contains(c))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(ExtractError::MissingColumns(missing));
            }
            columns.to_vec()
        };

        let fields: Vec<Field> = selected
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = selected
            .iter()
            .map(|name| {
                let values: StringArray = self
                    .rows
                    .iter()
                    .map(|row| row.get(name).and_then(|v| v.as_deref()))
                    .collect();
                Arc::new(values) as ArrayRef
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &options,
        )?)
    }
}

/// Trimmed text, with empty or whitespace-only content treated as absent.
fn cell(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Text before the first non-text child, as lxml's `.text` reads it.
fn leading_text(element: &Element) -> Option<String> {
    let text: String = element
        .children()
        .into_iter()
        .map_while(|c| match c {
            ChildOfElement::Text(t) => Some(t.text()),
            _ => None,
        })
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Read `source`, select every element matched by `query` and turn each one
/// into a row. Attributes and direct child elements become columns.
///
/// When `columns` is non-empty only those columns are kept, in that order;
/// any of them missing from the document is an error.
#[tracing::instrument(level = "info", skip_all, fields(path = %source.display(), query = %query))]
pub fn extract_table(source: &Path, query: &str, columns: &[String]) -> Result<RecordBatch> {
    if !source.is_file() {
        error!(path = %source.display(), "input file not found");
        return Err(ReportError::FileNotFound {
            path: source.to_path_buf(),
        });
    }

    match read_table(source, query, columns) {
        Ok(batch) => {
            debug!(
                rows = batch.num_rows(),
                columns = batch.num_columns(),
                "table extracted"
            );
            Ok(batch)
        }
        Err(e) => {
            error!(
                "failed to extract table: {}. Inputs: file: {}, xpath: {}, columns: {:?}",
                e,
                source.display(),
                query,
                columns
            );
            Err(ReportError::extraction(source, query, e))
        }
    }
}

fn read_table(
    source: &Path,
    query: &str,
    columns: &[String],
) -> std::result::Result<RecordBatch, ExtractError> {
    let selector = XPathQuery::compile(query)?;
    let text = fs::read_to_string(source)?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let parsed =
        roxmltree::Document::parse_with_options(text.trim_start_matches('\u{feff}'), options)?;

    let package = tree::to_package(&parsed);
    let doc = package.as_document();
    let elements = selector.select(&doc)?;
    if elements.is_empty() {
        return Err(ExtractError::NoMatches);
    }

    RawRecords::from_elements(&elements).into_batch(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{column_names, init_test_logging, string_column, write_file};
    use tempfile::tempdir;

    const QUERY: &str = "/configuration/interfaces/interface";

    const CONFIG: &str = r#"<?xml version="1.0"?>
<configuration>
  <interfaces>
    <interface mtu="9192">
      <name>ge-0/0/0</name>
      <description>core-sw-01</description>
      <encapsulation>ethernet-bridge</encapsulation>
    </interface>
    <interface>
      <name>ge-0/0/1</name>
      <description>   </description>
      <unit><name>0</name></unit>
    </interface>
    <interface>
      <name>ge-0/0/2</name>
      <encapsulation/>
    </interface>
  </interfaces>
</configuration>"#;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selects_requested_columns_in_order() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "router.xml", CONFIG);

        let batch =
            extract_table(&path, QUERY, &cols(&["encapsulation", "name", "description"]))
                .unwrap();

        assert_eq!(
            column_names(&batch),
            cols(&["encapsulation", "name", "description"])
        );
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(
            string_column(&batch, "encapsulation"),
            vec![Some("ethernet-bridge".to_string()), None, None]
        );
        assert_eq!(
            string_column(&batch, "description"),
            vec![Some("core-sw-01".to_string()), None, None]
        );
    }

    #[test]
    fn empty_column_list_keeps_everything_in_first_seen_order() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "router.txt", CONFIG);

        let batch = extract_table(&path, QUERY, &[]).unwrap();
        assert_eq!(
            column_names(&batch),
            cols(&["mtu", "name", "description", "encapsulation", "unit"])
        );
        assert_eq!(
            string_column(&batch, "mtu"),
            vec![Some("9192".to_string()), None, None]
        );
        // unit only holds child elements, so its own text is empty
        assert_eq!(string_column(&batch, "unit"), vec![None, None, None]);
    }

    #[test]
    fn missing_file_is_reported_before_the_query_is_looked_at() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let err = extract_table(&dir.path().join("nope.xml"), "[[[", &[]).unwrap_err();
        assert!(matches!(err, ReportError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_xml_keeps_the_parser_error() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "broken.xml", "<configuration><interfaces>");

        let err = extract_table(&path, QUERY, &[]).unwrap_err();
        match err {
            ReportError::Extraction { source, query, .. } => {
                assert_eq!(query, QUERY);
                let cause = source.downcast_ref::<ExtractError>().unwrap();
                assert!(matches!(cause, ExtractError::Xml(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unmatched_query_and_missing_columns_fail() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "router.xml", CONFIG);

        let err = extract_table(&path, "/configuration/vlans/vlan", &[]).unwrap_err();
        assert!(err.to_string().contains("matched no elements"));

        let err = extract_table(&path, QUERY, &cols(&["name", "speed"])).unwrap_err();
        match err {
            ReportError::Extraction { source, .. } => {
                let cause = source.downcast_ref::<ExtractError>().unwrap();
                assert!(
                    matches!(cause, ExtractError::MissingColumns(c) if c == &cols(&["speed"]))
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = extract_table(&path, "/configuration/interfaces/interface[", &[]).unwrap_err();
        match err {
            ReportError::Extraction { source, .. } => {
                let cause = source.downcast_ref::<ExtractError>().unwrap();
                assert!(matches!(cause, ExtractError::Query(QueryError::Compile { .. })));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn predicates_filter_matched_elements() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "router.xml", CONFIG);

        let batch = extract_table(
            &path,
            "/configuration/interfaces/interface[starts-with(name, 'ge-0/0/') and encapsulation]",
            &cols(&["name"]),
        )
        .unwrap();
        assert_eq!(
            string_column(&batch, "name"),
            vec![Some("ge-0/0/0".to_string()), Some("ge-0/0/2".to_string())]
        );

        let batch = extract_table(&path, "//interface[2]", &cols(&["name"])).unwrap();
        assert_eq!(
            string_column(&batch, "name"),
            vec![Some("ge-0/0/1".to_string())]
        );
    }

    /// Collects the fields of every span opened while it is installed.
    #[derive(Clone, Default)]
    struct SpanFields(Arc<std::sync::Mutex<Vec<(String, String)>>>);

    impl tracing::field::Visit for SpanFields {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0
                .lock()
                .unwrap()
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanFields {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            attrs.record(&mut self.clone());
        }
    }

    #[test]
    fn span_records_the_query() {
        use tracing_subscriber::layer::SubscriberExt;

        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "router.xml", CONFIG);
        let fields = SpanFields::default();
        let subscriber = tracing_subscriber::registry().with(fields.clone());

        tracing::subscriber::with_default(subscriber, || {
            extract_table(&path, QUERY, &[]).unwrap();
        });

        let recorded = fields.0.lock().unwrap();
        assert!(recorded
            .iter()
            .any(|(name, value)| name == "query" && value == QUERY));
    }

    #[test]
    fn doctype_declarations_are_accepted() {
        init_test_logging();
        let dir = tempdir().unwrap();
        let with_doctype = CONFIG.replacen(
            "<configuration>",
            "<!DOCTYPE configuration>\n<configuration>",
            1,
        );
        let path = write_file(dir.path(), "router.xml", &with_doctype);

        let batch = extract_table(&path, QUERY, &cols(&["name"])).unwrap();
        assert_eq!(batch.num_rows(), 3);
    }
}

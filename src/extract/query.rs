//! XPath 1.0 selection of repeated elements, evaluated with `sxd-xpath`.
//!
//! Relative queries are evaluated with the root element as the context node;
//! absolute queries start at the document node as usual. Only element nodes
//! of the resulting node-set are kept, in document order.

use std::fmt;

use sxd_document::dom::{ChildOfRoot, Document, Element};
use sxd_xpath::{nodeset::Node, Context, Factory, Value, XPath};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
    #[error("cannot compile `{query}`: {message}")]
    Compile { query: String, message: String },
    #[error("evaluating `{query}` failed: {message}")]
    Evaluate { query: String, message: String },
    #[error("`{query}` returned {kind} instead of a node-set")]
    NotNodeSet { query: String, kind: &'static str },
}

/// A compiled XPath expression.
pub struct XPathQuery {
    source: String,
    xpath: XPath,
}

impl fmt::Debug for XPathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("XPathQuery").field(&self.source).finish()
    }
}

impl XPathQuery {
    pub fn compile(query: &str) -> Result<Self, QueryError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }

        let xpath = Factory::new()
            .build(trimmed)
            .map_err(|e| QueryError::Compile {
                query: trimmed.to_string(),
                message: e.to_string(),
            })?
            .ok_or(QueryError::Empty)?;

        Ok(Self {
            source: trimmed.to_string(),
            xpath,
        })
    }

    /// Evaluate against `doc` and return the matched elements in document
    /// order. Attribute, text and other non-element nodes are ignored.
    pub fn select<'d>(&self, doc: &Document<'d>) -> Result<Vec<Element<'d>>, QueryError> {
        let context = Context::new();
        let root_element = doc.root().children().into_iter().find_map(|c| match c {
            ChildOfRoot::Element(e) => Some(e),
            _ => None,
        });
        let evaluated = match root_element {
            Some(element) => self.xpath.evaluate(&context, element),
            None => self.xpath.evaluate(&context, doc.root()),
        };
        let value = evaluated.map_err(|e| QueryError::Evaluate {
            query: self.source.clone(),
            message: e.to_string(),
        })?;

        let kind = match value {
            Value::Nodeset(nodes) => {
                return Ok(nodes
                    .document_order()
                    .into_iter()
                    .filter_map(|n| match n {
                        Node::Element(e) => Some(e),
                        _ => None,
                    })
                    .collect())
            }
            Value::Boolean(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
        };
        Err(QueryError::NotNodeSet {
            query: self.source.clone(),
            kind,
        })
    }
}

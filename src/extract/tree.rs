//! Copy a parsed `roxmltree` document into an `sxd-document` package so it
//! can be queried with XPath.
//!
//! Element and attribute names keep only their local part, so unprefixed
//! queries match namespaced Junos output. Comments and processing
//! instructions are not copied.

use roxmltree::Node;
use sxd_document::{
    dom::{Document, Element},
    Package,
};

pub fn to_package(source: &roxmltree::Document) -> Package {
    let package = Package::new();
    {
        let doc = package.as_document();
        let root = copy_element(&doc, source.root_element());
        doc.root().append_child(root);
    }
    package
}

fn copy_element<'d>(doc: &Document<'d>, node: Node<'_, '_>) -> Element<'d> {
    let element = doc.create_element(node.tag_name().name());
    for attr in node.attributes() {
        element.set_attribute_value(attr.name(), attr.value());
    }
    for child in node.children() {
        if child.is_element() {
            element.append_child(copy_element(doc, child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.append_child(doc.create_text(text));
            }
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxd_document::dom::{ChildOfElement, ChildOfRoot};

    #[test]
    fn copies_elements_attributes_and_text_without_prefixes() {
        let source = roxmltree::Document::parse(
            r#"<configuration xmlns:junos="http://xml.juniper.net/junos/">
  <interface junos:changed="changed" mtu="9192"><name>ge-0/0/0</name><!-- note --></interface>
</configuration>"#,
        )
        .unwrap();

        let package = to_package(&source);
        let doc = package.as_document();
        let root = match doc.root().children().into_iter().next() {
            Some(ChildOfRoot::Element(e)) => e,
            other => panic!("unexpected root child: {other:?}"),
        };
        assert_eq!(root.name().local_part(), "configuration");

        let interface = root
            .children()
            .into_iter()
            .find_map(|c| match c {
                ChildOfElement::Element(e) => Some(e),
                _ => None,
            })
            .unwrap();
        assert_eq!(interface.attribute_value("changed"), Some("changed"));
        assert_eq!(interface.attribute_value("mtu"), Some("9192"));
        // the comment is dropped, only the <name> element is left
        assert_eq!(interface.children().len(), 1);
    }
}

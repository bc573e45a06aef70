//! LDML document adapter.
//!
//! Converts XML text into the library-independent [`Element`] tree. Only the
//! `<collation>` subtree is kept; well-formedness checking is left to
//! `roxmltree`.

use crate::error::{CollationError, Result};
use crate::tree::Element;

/// Find the first `<collation>` element in an LDML document.
///
/// With `collation_type`, only a `<collation type="..">` with that type
/// matches. The document root itself may be the `<collation>` element.
pub fn parse_collation_xml(text: &str, collation_type: Option<&str>) -> Result<Element> {
    let doc = roxmltree::Document::parse(text)?;
    let node = doc
        .root_element()
        .descendants()
        .filter(|n| n.has_tag_name("collation"))
        .find(|n| collation_type.is_none_or(|ty| n.attribute("type") == Some(ty)))
        .ok_or(CollationError::MissingCollation)?;
    Ok(element_from_node(node))
}

fn element_from_node(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    element.attributes = node.attributes().map(|a| (a.name().to_string(), a.value().to_string())).collect();
    for child in node.children() {
        if child.is_element() {
            element.children.push(element_from_node(child));
        } else if child.is_text() {
            element.text.push_str(child.text().unwrap_or_default());
        }
    }
    element
}

// ABOUTME: Extraction of ResultRecords from matched DOM nodes.
// ABOUTME: Element, text and attribute matches all flow through here into immutable records.

//! Turning matched nodes into [`ResultRecord`]s.
//!
//! Elements are serialized (inner markup, descendants included) and reduced
//! to text with [`clean_markup`]; their attributes are copied into an owned
//! map and their parent element is kept as a [`NodeHandle`].

pub mod clean;

use std::collections::BTreeMap;

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};
use tracing::trace;

use crate::dom::XPathHit;
use crate::result::{NodeHandle, ResultRecord};

pub use clean::clean_markup;

/// Extract one record per element, preserving order.
pub fn extract<'a, I>(nodes: I) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    nodes.into_iter().map(extract_element).collect()
}

/// Extract a record from a single element.
pub fn extract_element(el: ElementRef<'_>) -> ResultRecord {
    let text = clean_markup(&el.inner_html());
    trace!(tag = el.value().name(), text_len = text.len(), "extracted element");

    let attributes: BTreeMap<String, String> = el
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    ResultRecord::new(Some(text), Some(attributes), parent_element(*el))
}

/// Extract a record from an XPath hit.
///
/// Text and attribute hits have no attributes of their own; their parent is
/// the element that holds them.
pub fn extract_hit(hit: &XPathHit<'_>) -> ResultRecord {
    match hit {
        XPathHit::Element(el) => extract_element(*el),
        XPathHit::Text(node) => {
            let text = node
                .value()
                .as_text()
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            ResultRecord::new(Some(text), None, parent_element(*node))
        }
        XPathHit::Attribute { owner, value, .. } => {
            ResultRecord::new(Some(value.clone()), None, Some(owner.id()))
        }
    }
}

/// Handle of the nearest parent if it is an element; the document node does not count.
fn parent_element(node: NodeRef<'_, Node>) -> Option<NodeHandle> {
    node.parent()
        .filter(|parent| parent.value().is_element())
        .map(|parent| parent.id())
}

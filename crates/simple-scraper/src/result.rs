// ABOUTME: ResultRecord, the immutable per-match record returned by every query.
// ABOUTME: Holds cleaned text, a copied attribute map and a non-owning parent handle.

use std::collections::BTreeMap;

use ego_tree::NodeId;
use serde::{Deserialize, Serialize};

/// Handle to a node inside the document a record was extracted from.
///
/// Only meaningful together with that document; resolve it with
/// [`Scraper::node`](crate::Scraper::node).
pub type NodeHandle = NodeId;

/// One matched node.
///
/// Records never own or borrow the document. `text` distinguishes an empty
/// string (`Some("")`, the node cleaned to nothing) from absence (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResultRecord {
    text: Option<String>,
    attributes: Option<BTreeMap<String, String>>,
    #[serde(skip)]
    parent: Option<NodeHandle>,
}

impl ResultRecord {
    pub fn new(
        text: Option<String>,
        attributes: Option<BTreeMap<String, String>>,
        parent: Option<NodeHandle>,
    ) -> Self {
        Self {
            text,
            attributes,
            parent,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        self.attributes.as_ref()
    }

    /// Value of a single attribute, if the record has attributes and this one is set.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(name))
            .map(String::as_str)
    }

    /// Handle of the parent element; `None` for the root element.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }
}

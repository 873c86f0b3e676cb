// ABOUTME: XPath 1.0 evaluation over a scraper document via an sxd_document mirror tree.
// ABOUTME: Mirrored elements and text nodes are indexed back to their scraper NodeIds.

use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};
use sxd_document::dom::{Document, Element};
use sxd_document::Package;
use sxd_xpath::nodeset::Node as XNode;
use sxd_xpath::{evaluate_xpath, Value};
use tracing::trace;

use crate::error::{Result, ScrapeError};

/// A node selected by an XPath expression, expressed in terms of the scraper tree.
#[derive(Debug, Clone)]
pub enum XPathHit<'a> {
    /// An element, e.g. `//p`. The document root (`/`) is reported as the root element.
    Element(ElementRef<'a>),
    /// A text node, e.g. `//p/text()`.
    Text(NodeRef<'a, Node>),
    /// An attribute, e.g. `//a/@href`. Attributes have no node in the scraper
    /// tree, so the owner element is carried instead.
    Attribute {
        owner: ElementRef<'a>,
        name: String,
        value: String,
    },
}

type Index<'d> = HashMap<XNode<'d>, NodeId>;

/// Evaluate `expr` against `doc` and return the selected nodes in document order.
///
/// Only node-set results can be selected; an expression evaluating to a
/// number, string or boolean is a `Query` error. Comments are not mirrored
/// and never match.
pub fn select<'a>(doc: &'a Html, expr: &str) -> Result<Vec<XPathHit<'a>>> {
    let package = Package::new();
    let mirror = package.as_document();
    let index = build_mirror(&mirror, doc);
    trace!(nodes = index.len(), "built xpath mirror");

    let value = evaluate_xpath(&mirror, expr).map_err(|e| {
        ScrapeError::query_syntax(
            "",
            "ByXPath",
            Some(anyhow::anyhow!("invalid XPath {:?}: {}", expr, e)),
        )
    })?;

    let nodes = match value {
        Value::Nodeset(nodes) => nodes,
        Value::Boolean(b) => return Err(not_a_nodeset(expr, format!("boolean {}", b))),
        Value::Number(n) => return Err(not_a_nodeset(expr, format!("number {}", n))),
        Value::String(s) => return Err(not_a_nodeset(expr, format!("string {:?}", s))),
    };

    let hits = nodes
        .document_order()
        .into_iter()
        .filter_map(|node| match node {
            XNode::Root(_) | XNode::Element(_) => resolve(doc, &index, node)
                .and_then(ElementRef::wrap)
                .map(XPathHit::Element),
            XNode::Text(_) => resolve(doc, &index, node).map(XPathHit::Text),
            XNode::Attribute(attr) => {
                let owner = attr
                    .parent()
                    .and_then(|el| resolve(doc, &index, XNode::Element(el)))
                    .and_then(ElementRef::wrap)?;
                Some(XPathHit::Attribute {
                    owner,
                    name: attr.name().local_part().to_string(),
                    value: attr.value().to_string(),
                })
            }
            _ => None,
        })
        .collect();

    Ok(hits)
}

fn resolve<'a, 'd>(
    doc: &'a Html,
    index: &Index<'d>,
    node: XNode<'d>,
) -> Option<NodeRef<'a, Node>> {
    index.get(&node).and_then(|id| doc.tree.get(*id))
}

fn not_a_nodeset(expr: &str, got: String) -> ScrapeError {
    ScrapeError::query(
        "",
        "ByXPath",
        Some(anyhow::anyhow!(
            "XPath {:?} evaluated to {}, not a node-set",
            expr,
            got
        )),
    )
}

/// Copy the element/text structure of `doc` into `mirror`.
fn build_mirror<'d>(mirror: &Document<'d>, doc: &Html) -> Index<'d> {
    let mut index = Index::new();
    let root_element = doc.root_element();
    let element = mirror_element(mirror, root_element, &mut index);
    mirror.root().append_child(element);
    index.insert(XNode::Root(mirror.root()), root_element.id());
    index
}

fn mirror_element<'d>(
    mirror: &Document<'d>,
    el: ElementRef<'_>,
    index: &mut Index<'d>,
) -> Element<'d> {
    let element = mirror.create_element(el.value().name());
    for (name, value) in el.value().attrs() {
        element.set_attribute_value(name, value);
    }
    index.insert(XNode::Element(element), el.id());

    for child in el.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    element.append_child(mirror_element(mirror, child_el, index));
                }
            }
            Node::Text(text) => {
                let t = mirror.create_text(&text.text);
                element.append_child(t);
                index.insert(XNode::Text(t), child.id());
            }
            _ => {}
        }
    }

    element
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<html>
        <head><title>Sample</title></head>
        <body>
            <!-- navigation -->
            <ul class="items">
                <li>One</li>
                <li class="hot">Two</li>
                <li>Three</li>
            </ul>
            <a href="/next">Next</a>
        </body>
        </html>"#;

    fn parse() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    fn element_text(hit: &XPathHit<'_>) -> String {
        match hit {
            XPathHit::Element(el) => el.text().collect(),
            other => panic!("expected element hit, got {:?}", other),
        }
    }

    #[test]
    fn test_descendant_elements_in_document_order() {
        let doc = parse();
        let hits = select(&doc, "//li").unwrap();
        let texts: Vec<String> = hits.iter().map(element_text).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_absolute_path_with_position() {
        let doc = parse();
        let hits = select(&doc, "/html/body/ul/li[2]").unwrap();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            XPathHit::Element(el) => assert_eq!(el.value().attr("class"), Some("hot")),
            other => panic!("expected element hit, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_predicate() {
        let doc = parse();
        let hits = select(&doc, "//li[@class='hot']").unwrap();
        assert_eq!(hits.iter().map(element_text).collect::<Vec<_>>(), vec!["Two"]);
    }

    #[test]
    fn test_text_node_maps_back_to_scraper_tree() {
        let doc = parse();
        let hits = select(&doc, "//li[@class='hot']/text()").unwrap();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            XPathHit::Text(node) => {
                assert_eq!(node.value().as_text().map(|t| &**t), Some("Two"));
                let parent = node.parent().and_then(ElementRef::wrap).unwrap();
                assert_eq!(parent.value().name(), "li");
            }
            other => panic!("expected text hit, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_node_carries_owner() {
        let doc = parse();
        let hits = select(&doc, "//a/@href").unwrap();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            XPathHit::Attribute { owner, name, value } => {
                assert_eq!(owner.value().name(), "a");
                assert_eq!(name, "href");
                assert_eq!(value, "/next");
            }
            other => panic!("expected attribute hit, got {:?}", other),
        }
    }

    #[test]
    fn test_root_is_reported_as_root_element() {
        let doc = parse();
        let hits = select(&doc, "/").unwrap();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            XPathHit::Element(el) => assert_eq!(el.value().name(), "html"),
            other => panic!("expected element hit, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_never_match() {
        let doc = parse();
        assert!(select(&doc, "//comment()").unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let doc = parse();
        assert!(select(&doc, "//table").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_expression_is_query_syntax_error() {
        let doc = parse();
        let err = select(&doc, "//li[").unwrap_err();
        assert!(err.is_query_syntax());
    }

    #[test]
    fn test_unknown_function_is_query_syntax_error() {
        let doc = parse();
        let err = select(&doc, "//li[frobnicate()]").unwrap_err();
        assert!(err.is_query_syntax());
    }

    #[test]
    fn test_scalar_result_is_query_error() {
        let doc = parse();
        let err = select(&doc, "count(//li)").unwrap_err();
        assert!(err.is_query());
        assert!(err.to_string().contains("number 3"));
    }
}

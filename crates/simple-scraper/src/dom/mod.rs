// ABOUTME: DOM query engine: CSS selector and XPath 1.0 matching over scraper's HTML tree.
// ABOUTME: Both entry points report matches against the scraper document's own nodes.

//! DOM querying for parsed HTML documents.
//!
//! Documents are parsed with `scraper`. CSS selectors run on that tree
//! directly; XPath expressions are evaluated on an `sxd_document` mirror of it
//! whose nodes are indexed back to the scraper tree.

pub mod css;
pub mod xpath;

pub use xpath::XPathHit;

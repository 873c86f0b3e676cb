// ABOUTME: CSS selector matching over a parsed scraper document.
// ABOUTME: Malformed selectors become QuerySyntax errors carrying the parser's message.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};

/// Compile a CSS selector.
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        ScrapeError::query_syntax(
            "",
            "BySelector",
            Some(anyhow::anyhow!("invalid selector {:?}: {}", css, e)),
        )
    })
}

/// Select every element matching `css`, in document order.
pub fn select<'a>(doc: &'a Html, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = compile(css)?;
    Ok(doc.select(&selector).collect())
}

// ABOUTME: Main library entry point for simple-scraper.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, ResultRecord, ScrapeError, ErrorCode.

//! simple-scraper - fetch one web page and pull text and attributes out of it.
//!
//! A [`Scraper`] fetches a page once (blocking), parses it, and answers any
//! number of CSS selector or XPath 1.0 queries against it. Every matched node
//! becomes a [`ResultRecord`] holding its cleaned text, a copy of its
//! attributes and a handle to its parent element.
//!
//! # Example
//!
//! ```no_run
//! use simple_scraper::{ScrapeError, Scraper};
//!
//! fn main() -> Result<(), ScrapeError> {
//!     let scraper = Scraper::new("https://example.com/")?;
//!     println!("status: {:?}", scraper.status_code());
//!     for record in scraper.by_selector("body > div > p")? {
//!         println!("{}", record.text().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod result;
pub mod scrape;

pub use crate::error::{ErrorCode, Result, ScrapeError};
pub use crate::extractors::{clean_markup, extract};
pub use crate::options::{Options, ScraperBuilder};
pub use crate::resource::FetchResult;
pub use crate::result::{NodeHandle, ResultRecord};
pub use crate::scrape::Scraper;

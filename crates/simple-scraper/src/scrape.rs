// ABOUTME: The Scraper struct: one fetched and parsed page plus its query entry points.
// ABOUTME: by_selector/by_xpath run the DOM query and extract ResultRecords; contains_* test for matches.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::dom::{css, xpath};
use crate::error::{Result, ScrapeError};
use crate::extractors::{extract, extract_hit};
use crate::options::{Options, ScraperBuilder};
use crate::resource::{fetch, validate_url, FetchResult};
use crate::result::{NodeHandle, ResultRecord};

/// A single web page, fetched once and queried any number of times.
///
/// Create one `Scraper` per page. Queries never touch the network; they run
/// against the document parsed at construction time.
#[derive(Debug)]
pub struct Scraper {
    request_url: String,
    response: Option<FetchResult>,
    document: Html,
    opts: Options,
}

impl Scraper {
    /// Fetch `url` with default options and parse the response.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_options(url, Options::default())
    }

    /// Create a new ScraperBuilder for custom configuration.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Fetch `url` with the given options and parse the response.
    pub fn with_options(url: &str, opts: Options) -> Result<Self> {
        let (response, document) = load(url, &opts)?;
        Ok(Self {
            request_url: url.to_string(),
            response: Some(response),
            document,
            opts,
        })
    }

    /// Parse an already-loaded document. `url` names the page it came from.
    ///
    /// No request is made, so there is no response, status code or encoding.
    pub fn from_html(html: &str, url: &str) -> Result<Self> {
        validate_url(url)?;
        Ok(Self {
            request_url: url.to_string(),
            response: None,
            document: Html::parse_document(html),
            opts: Options::default(),
        })
    }

    /// Fetch a different page into this instance.
    ///
    /// On failure the previously loaded page is kept.
    #[deprecated(note = "create a new Scraper for each page instead")]
    pub fn refetch(&mut self, url: &str) -> Result<()> {
        let (response, document) = load(url, &self.opts)?;
        self.request_url = url.to_string();
        self.response = Some(response);
        self.document = document;
        Ok(())
    }

    /// The URL this page was requested with.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// The HTTP response, when the page was fetched.
    pub fn response(&self) -> Option<&FetchResult> {
        self.response.as_ref()
    }

    /// HTTP status code of the fetched page (e.g. 200, 404).
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Encoding detected from the fetched body (e.g. `"UTF-8"`).
    pub fn encoding(&self) -> Option<&'static str> {
        self.response.as_ref().map(FetchResult::encoding)
    }

    /// The parsed document.
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Resolve a handle taken from a record of this page.
    pub fn node(&self, handle: NodeHandle) -> Option<ElementRef<'_>> {
        self.document.tree.get(handle).and_then(ElementRef::wrap)
    }

    /// Extract every element matching a CSS selector.
    pub fn by_selector(&self, css_selector: &str) -> Result<Vec<ResultRecord>> {
        let matches = css::select(&self.document, css_selector)
            .map_err(|e| e.with_url(&self.request_url))?;
        debug!(
            url = %self.request_url,
            selector = css_selector,
            matches = matches.len(),
            "css query"
        );
        Ok(extract(matches))
    }

    /// Extract every node selected by an XPath 1.0 expression.
    pub fn by_xpath(&self, xpath: &str) -> Result<Vec<ResultRecord>> {
        let hits = xpath::select(&self.document, xpath)
            .map_err(|e| e.with_url(&self.request_url))?;
        debug!(
            url = %self.request_url,
            xpath,
            matches = hits.len(),
            "xpath query"
        );
        Ok(hits.iter().map(extract_hit).collect())
    }

    /// True if at least one element matches the CSS selector.
    pub fn contains_selector(&self, css_selector: &str) -> Result<bool> {
        Ok(!self.by_selector(css_selector)?.is_empty())
    }

    /// True if the XPath expression selects at least one node.
    pub fn contains_xpath(&self, xpath: &str) -> Result<bool> {
        Ok(!self.by_xpath(xpath)?.is_empty())
    }
}

/// Fetch and parse one page.
fn load(url: &str, opts: &Options) -> Result<(FetchResult, Html)> {
    let client = match &opts.http_client {
        Some(client) => client.clone(),
        None => build_http_client(url, opts)?,
    };
    let response = fetch(&client, url)?;
    let document = Html::parse_document(&response.text());
    Ok((response, document))
}

fn build_http_client(url: &str, opts: &Options) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(&opts.user_agent)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| ScrapeError::fetch(url, "BuildClient", Some(e.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Reviews</title></head>
<body>
    <div id="commentArea">
        <div class="comment"><p>Great <b>stay</b>.<br>Would return.</p></div>
        <div class="comment"><p>  Noisy at night.  </p></div>
    </div>
</body>
</html>"#;

    fn offline() -> Scraper {
        Scraper::from_html(PAGE, "https://example.com/reviews").unwrap()
    }

    #[test]
    fn test_by_selector_cleans_text() {
        let records = offline().by_selector("#commentArea .comment > p").unwrap();
        let texts: Vec<_> = records.iter().map(|r| r.text().unwrap()).collect();
        assert_eq!(texts, vec!["Great stay.\nWould return.", "Noisy at night."]);
    }

    #[test]
    fn test_by_xpath_matches_by_selector() {
        let scraper = offline();
        let via_xpath = scraper.by_xpath("//div[@id='commentArea']/div/p").unwrap();
        let via_css = scraper.by_selector("#commentArea > div > p").unwrap();
        assert_eq!(via_xpath, via_css);
    }

    #[test]
    fn test_parent_resolves_through_scraper() {
        let scraper = offline();
        let records = scraper.by_selector("p").unwrap();
        let parent = scraper.node(records[0].parent().unwrap()).unwrap();
        assert_eq!(parent.value().attr("class"), Some("comment"));
    }

    #[test]
    fn test_contains() {
        let scraper = offline();
        assert!(scraper.contains_selector(".comment").unwrap());
        assert!(!scraper.contains_selector(".missing").unwrap());
        assert!(scraper.contains_xpath("//p").unwrap());
        assert!(!scraper.contains_xpath("//table").unwrap());
    }

    #[test]
    fn test_query_errors_carry_page_url() {
        let scraper = offline();
        let err = scraper.by_selector("div[").unwrap_err();
        assert!(err.is_query_syntax());
        assert_eq!(err.url, "https://example.com/reviews");

        let err = scraper.contains_xpath("//div[").unwrap_err();
        assert!(err.is_query_syntax());
        assert_eq!(err.url, "https://example.com/reviews");
    }

    #[test]
    fn test_from_html_has_no_response() {
        let scraper = offline();
        assert!(scraper.response().is_none());
        assert_eq!(scraper.status_code(), None);
        assert_eq!(scraper.encoding(), None);
        assert_eq!(scraper.request_url(), "https://example.com/reviews");
    }

    #[test]
    fn test_from_html_rejects_bad_url() {
        let err = Scraper::from_html(PAGE, "reviews.html").unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_new_fetches_and_exposes_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/reviews");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PAGE);
        });

        let scraper = Scraper::new(&server.url("/reviews")).unwrap();
        mock.assert();

        assert_eq!(scraper.status_code(), Some(200));
        assert!(scraper.encoding().is_some());
        assert_eq!(scraper.by_selector(".comment").unwrap().len(), 2);
    }

    #[test]
    fn test_builder_user_agent_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/").header("user-agent", "review-bot/2");
            then.status(200).body("<p>ok</p>");
        });

        let scraper = Scraper::builder()
            .user_agent("review-bot/2")
            .build(&server.url("/"))
            .unwrap();
        mock.assert();
        assert_eq!(scraper.by_selector("p").unwrap()[0].text(), Some("ok"));
    }

    #[test]
    #[allow(deprecated)]
    fn test_refetch_replaces_page_and_keeps_it_on_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/one");
            then.status(200).body("<p>one</p>");
        });
        server.mock(|when, then| {
            when.method(GET).path("/two");
            then.status(404).body("<p>two</p>");
        });

        let mut scraper = Scraper::new(&server.url("/one")).unwrap();
        scraper.refetch(&server.url("/two")).unwrap();
        assert_eq!(scraper.status_code(), Some(404));
        assert_eq!(scraper.by_selector("p").unwrap()[0].text(), Some("two"));

        let err = scraper.refetch("not a url").unwrap_err();
        assert!(err.is_invalid_url());
        assert_eq!(scraper.request_url(), server.url("/two"));
        assert_eq!(scraper.by_selector("p").unwrap()[0].text(), Some("two"));
    }
}

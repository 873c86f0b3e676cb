// ABOUTME: Configuration options for the scraper and the ScraperBuilder fluent API.
// ABOUTME: Only the User-Agent and an injectable blocking HTTP client are configurable.

use crate::error::Result;
use crate::scrape::Scraper;

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("simple-scraper/", env!("CARGO_PKG_VERSION"));

/// Configuration options for a [`Scraper`].
#[derive(Debug, Clone)]
pub struct Options {
    pub user_agent: String,
    pub http_client: Option<reqwest::blocking::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
        }
    }
}

/// Builder for constructing Scraper instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ScraperBuilder {
    opts: Options,
}

impl ScraperBuilder {
    /// Create a new ScraperBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the User-Agent header.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom blocking HTTP client.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Fetch `url` and build a Scraper over the returned page.
    pub fn build(self, url: &str) -> Result<Scraper> {
        Scraper::with_options(url, self.opts)
    }
}

impl Default for ScraperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ABOUTME: Error types for the scraper including the ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the stage of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    QuerySyntax,
    Query,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::QuerySyntax => "query syntax error",
            ErrorCode::Query => "query error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for every fallible scraper operation.
///
/// `source` keeps the collaborator's own error (reqwest, the selector parser,
/// the XPath evaluator) so its message is shown unchanged.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scraper: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a QuerySyntax error.
    pub fn query_syntax(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::QuerySyntax, url, op, source)
    }

    /// Create a Query error.
    pub fn query(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Query, url, op, source)
    }

    /// Replace the URL the error is reported against.
    ///
    /// The DOM layer does not know which page it is querying; the scraper
    /// fills the URL in on the way out.
    pub(crate) fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a QuerySyntax error.
    pub fn is_query_syntax(&self) -> bool {
        self.code == ErrorCode::QuerySyntax
    }

    /// Returns true if this is a Query error.
    pub fn is_query(&self) -> bool {
        self.code == ErrorCode::Query
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

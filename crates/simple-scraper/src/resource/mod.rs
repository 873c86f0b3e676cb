// ABOUTME: Page loader: blocking HTTP fetch of a single page plus charset handling.
// ABOUTME: Exposes status, final URL, content-type, raw body and the detected encoding.

use bytes::Bytes;
use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{Result, ScrapeError};

/// Result of a successful fetch operation.
///
/// Any HTTP status counts as success; the status is exposed, never judged.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body, preferring the `charset=` of the content-type header
    /// and falling back to the detected encoding.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }

    /// Name of the encoding detected from the body bytes alone (e.g. `"UTF-8"`).
    pub fn encoding(&self) -> &'static str {
        detect_encoding(&self.body).name()
    }
}

/// Guess the encoding of raw bytes with chardetng.
fn detect_encoding(body: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    detector.guess(None, true)
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let (decoded, _, _) = detect_encoding(body).decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Check that `url` is an absolute http(s) URL.
pub(crate) fn validate_url(url: &str) -> Result<url::Url> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, "Fetch", None));
    }

    let parsed = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ScrapeError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}

/// Fetch a page with a single blocking GET request.
pub fn fetch(client: &reqwest::blocking::Client, url: &str) -> Result<FetchResult> {
    let parsed = validate_url(url)?;

    debug!(url, "fetching page");
    let response = client
        .get(parsed)
        .send()
        .map_err(|e| ScrapeError::fetch(url, "Fetch", Some(e.into())))?;

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response
        .bytes()
        .map_err(|e| ScrapeError::fetch(url, "Fetch", Some(e.into())))?;

    debug!(url, status, bytes = body.len(), "page fetched");

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}

//! Best-effort page metadata fetching.
//!
//! Stories are enriched with the title/description/image of the page they
//! link to. Sites vary their response by user agent, so requests go out
//! with a desktop-browser UA. Every failure mode (network error, non-2xx
//! status, unparsable HTML) collapses to an all-`None` [`PageMetadata`] at
//! the public boundary; enrichment is never allowed to fail a story.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::model::PageMetadata;

/// Desktop-browser user agent sent with metadata requests.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

/// Why a metadata fetch failed. Internal detail: callers of
/// [`MetadataFetcher::fetch`] only ever see empty metadata.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// HTTP client wrapper for scraping page metadata.
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    client: reqwest::Client,
}

impl MetadataFetcher {
    /// Build a fetcher with a bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch the page at `url` and extract its metadata.
    ///
    /// Never fails: any error is absorbed and reported as empty metadata.
    pub async fn fetch(&self, url: &str) -> PageMetadata {
        match self.try_fetch(url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(url, error = %e, "Metadata fetch failed");
                PageMetadata::default()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<PageMetadata, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let html = response.text().await?;
        Ok(extract_metadata(&html))
    }
}

/// Extract title, description, and image from an HTML document.
///
/// Priority order per field: `og:title` then `<title>` text; `og:description`
/// then `meta[name=description]`; `og:image` then the legacy
/// `link[rel=image_src]` tag. Empty or whitespace-only values are ignored.
#[must_use]
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#, "content")
        .or_else(|| title_text(&document));
    let description = meta_content(&document, r#"meta[property="og:description"]"#, "content")
        .or_else(|| meta_content(&document, r#"meta[name="description"]"#, "content"));
    let image = meta_content(&document, r#"meta[property="og:image"]"#, "content")
        .or_else(|| meta_content(&document, r#"link[rel="image_src"]"#, "href"));

    PageMetadata {
        title,
        description,
        image,
    }
}

/// Read an attribute off the first element matching `selector`.
fn meta_content(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("Invalid selector");
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Text content of the document's `<title>` element.
fn title_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("Invalid selector");
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

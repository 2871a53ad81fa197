#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Source fetching and reconciliation for legislator contact data.
//!
//! Provides the [`Scraper`] trait and the concrete implementations for the
//! comparison datasets: the member listing CSV ([`csv_download`]) and the
//! web member table ([`html_table`]). Rows come back as
//! [`serde_json::Value`] objects; [`keyed`] turns them into phone-keyed
//! maps and [`merge`] folds one source into another.

pub mod csv_download;
pub mod html_table;
pub mod keyed;
pub mod merge;
pub mod progress;

use std::collections::BTreeMap;

/// Errors that can occur during scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single page of scraped records.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// The records extracted from this page.
    pub records: Vec<serde_json::Value>,
    /// Whether there are more pages available after this one.
    pub has_more: bool,
    /// The zero-indexed page number of this result set.
    pub page_number: u32,
}

/// Configuration shared across scraper implementations.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// The URL to scrape.
    pub url: String,
    /// Additional HTTP headers to include in requests.
    pub headers: BTreeMap<String, String>,
}

impl ScrapeConfig {
    /// Creates a new `ScrapeConfig` for the given URL.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            headers: BTreeMap::new(),
        }
    }

    /// Adds an HTTP header to include in requests.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Builds a [`reqwest::Client`] with the configured headers.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if a header name or value is not
    /// valid HTTP.
    pub fn build_client(&self) -> Result<reqwest::Client, ScrapeError> {
        let mut header_map = reqwest::header::HeaderMap::new();
        for (key, value) in &self.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ScrapeError::Parse(format!("invalid header name '{key}': {e}")))?;
            let val = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| ScrapeError::Parse(format!("invalid header value '{value}': {e}")))?;
            header_map.insert(name, val);
        }
        reqwest::Client::builder()
            .default_headers(header_map)
            .build()
            .map_err(ScrapeError::Http)
    }
}

/// Trait for fetching structured data from a web source.
///
/// Implementations handle a specific scraping strategy (HTML table parsing,
/// CSV download, PDF directory extraction) and return normalised records
/// as [`serde_json::Value`] objects.
pub trait Scraper: Send + Sync {
    /// Fetches a single page of records.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the HTTP request or response parsing fails.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<ScrapedPage, ScrapeError>> + Send;

    /// Returns the name of the scraping strategy (e.g. `"html_table"`,
    /// `"csv_download"`).
    fn strategy(&self) -> &str;
}

/// Fetches all pages from a scraper sequentially.
///
/// # Errors
///
/// Returns the first [`ScrapeError`] encountered during fetching.
pub async fn scrape_all(
    scraper: &(impl Scraper + ?Sized),
    max_pages: Option<u32>,
) -> Result<Vec<serde_json::Value>, ScrapeError> {
    let mut all_records = Vec::new();
    let mut page: u32 = 0;

    loop {
        if let Some(max) = max_pages
            && page >= max
        {
            log::info!("Reached max pages ({max}), stopping");
            break;
        }

        log::debug!("Fetching {} page {page}", scraper.strategy());
        let result = scraper.fetch_page(page).await?;
        let has_more = result.has_more;

        all_records.extend(result.records);

        if !has_more {
            break;
        }

        page += 1;
    }

    log::info!(
        "{} scrape complete, {} total records",
        scraper.strategy(),
        all_records.len()
    );
    Ok(all_records)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves a fixed number of pages of one record each.
    struct Paged {
        pages: u32,
    }

    impl Scraper for Paged {
        async fn fetch_page(&self, page: u32) -> Result<ScrapedPage, ScrapeError> {
            Ok(ScrapedPage {
                records: vec![serde_json::json!({ "page": page })],
                has_more: page + 1 < self.pages,
                page_number: page,
            })
        }

        fn strategy(&self) -> &'static str {
            "paged"
        }
    }

    #[tokio::test]
    async fn scrape_all_follows_pages() {
        let records = scrape_all(&Paged { pages: 3 }, None).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["page"], 2);
    }

    #[tokio::test]
    async fn scrape_all_respects_max_pages() {
        let records = scrape_all(&Paged { pages: 10 }, Some(2)).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn rejects_invalid_header_values() {
        let config = ScrapeConfig::new("https://www.aph.gov.au").with_header("Accept", "bad\nvalue");
        assert!(matches!(config.build_client(), Err(ScrapeError::Parse(_))));
    }
}

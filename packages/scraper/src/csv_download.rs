//! CSV member listing downloader and parser.
//!
//! Downloads a CSV (optionally gzip-compressed) from a URL, parses it, and
//! returns every row as a [`serde_json::Value`] object keyed by the column
//! headers in the first row.

use std::io::Read as _;

use crate::{ScrapeConfig, ScrapeError, ScrapedPage, Scraper};

/// Scraper that downloads and parses a CSV file.
///
/// All records are returned in a single [`ScrapedPage`] with `has_more` set to
/// `false`, since the entire file is downloaded at once.
#[derive(Debug, Clone)]
pub struct CsvDownloadScraper {
    /// URL and headers for the download request.
    config: ScrapeConfig,
    /// Whether the response body is gzip-compressed.
    is_gzipped: bool,
    /// Field delimiter byte (defaults to `,`).
    delimiter: u8,
}

impl CsvDownloadScraper {
    /// Creates a new `CsvDownloadScraper` for the given URL with default
    /// settings (comma-delimited, not gzipped).
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            config: ScrapeConfig::new(url),
            is_gzipped: false,
            delimiter: b',',
        }
    }

    /// Marks the download as gzip-compressed so that the response body will be
    /// decompressed before CSV parsing.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.is_gzipped = gzipped;
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Adds an HTTP header to include in the download request.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.config = self.config.with_header(key, value);
        self
    }

    /// Turns a downloaded body into row objects.
    fn parse_body(&self, bytes: &[u8]) -> Result<Vec<serde_json::Value>, ScrapeError> {
        if self.is_gzipped {
            let decompressed = decompress_gzip(bytes)?;
            log::debug!("Decompressed to {} bytes", decompressed.len());
            parse_csv(&decompressed, self.delimiter)
        } else {
            parse_csv(bytes, self.delimiter)
        }
    }
}

/// Decompresses a gzip body.
fn decompress_gzip(bytes: &[u8]) -> Result<Vec<u8>, ScrapeError> {
    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Parses CSV bytes into one JSON object per row, keyed by the trimmed
/// header names. Short rows are padded with empty strings.
///
/// # Errors
///
/// Returns [`ScrapeError::Csv`] for malformed input and
/// [`ScrapeError::Parse`] if there is no header row.
pub fn parse_csv(bytes: &[u8], delimiter: u8) -> Result<Vec<serde_json::Value>, ScrapeError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let csv_headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if csv_headers.iter().all(String::is_empty) {
        return Err(ScrapeError::Parse(
            "CSV file contains no header row".to_owned(),
        ));
    }

    let mut records: Vec<serde_json::Value> = Vec::new();

    for result in reader.records() {
        let record = result?;

        let mut map = serde_json::Map::new();
        for (i, header) in csv_headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            map.insert(header.clone(), serde_json::Value::String(value));
        }
        records.push(serde_json::Value::Object(map));
    }

    Ok(records)
}

impl Scraper for CsvDownloadScraper {
    async fn fetch_page(&self, page: u32) -> Result<ScrapedPage, ScrapeError> {
        // CSV downloads are single-page: only page 0 contains data.
        if page > 0 {
            return Ok(ScrapedPage {
                records: Vec::new(),
                has_more: false,
                page_number: page,
            });
        }

        let client = self.config.build_client()?;
        let response = client
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {}", bytes.len(), self.config.url);

        let records = self.parse_body(&bytes)?;

        log::info!(
            "Parsed {} records from CSV at {}",
            records.len(),
            self.config.url
        );

        Ok(ScrapedPage {
            records,
            has_more: false,
            page_number: 0,
        })
    }

    fn strategy(&self) -> &'static str {
        "csv_download"
    }
}

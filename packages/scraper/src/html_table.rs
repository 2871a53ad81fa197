//! HTML member table scraper.
//!
//! Fetches an HTML page, locates a `<table>` element via CSS selector, and
//! extracts each row into a [`serde_json::Value`] object keyed by the column
//! headers found in the `<thead>`.

use scraper::{Html, Selector};

use crate::{ScrapeConfig, ScrapeError, ScrapedPage, Scraper};

/// Scraper that extracts records from an HTML table.
///
/// The default selectors work with standard `<table>` / `<thead>` / `<tbody>`
/// markup. Use the builder methods to customise selectors for non-standard
/// layouts.
#[derive(Debug, Clone)]
pub struct HtmlTableScraper {
    /// Shared scrape configuration (URL, headers).
    config: ScrapeConfig,
    /// CSS selector for the target table element.
    table_selector: String,
    /// CSS selector for header cells inside the table.
    header_row_selector: String,
    /// CSS selector for body rows inside the table.
    body_row_selector: String,
    /// CSS selector for cells within a body row.
    cell_selector: String,
}

impl HtmlTableScraper {
    /// Creates a new `HtmlTableScraper` for the given URL with default CSS
    /// selectors.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            config: ScrapeConfig::new(url),
            table_selector: "table".to_owned(),
            header_row_selector: "thead tr th, thead tr td".to_owned(),
            body_row_selector: "tbody tr".to_owned(),
            cell_selector: "td".to_owned(),
        }
    }

    /// Overrides the CSS selector used to locate the table element.
    #[must_use]
    pub fn with_table_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.table_selector);
        self
    }

    /// Adds an HTTP header to include in the request.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.config = self.config.with_header(key, value);
        self
    }

    /// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
    fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
        Selector::parse(selector)
            .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
    }

    /// Extracts the table rows from an HTML document.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if a selector is invalid, no table
    /// matches, or the table has no header cells.
    pub fn parse_table(&self, body: &str) -> Result<Vec<serde_json::Value>, ScrapeError> {
        let document = Html::parse_document(body);

        // ── Locate the table ────────────────────────────────────────────
        let table_sel = Self::parse_selector(&self.table_selector)?;
        let table_element = document.select(&table_sel).next().ok_or_else(|| {
            ScrapeError::Parse(format!(
                "no element matching '{}' found in response",
                self.table_selector
            ))
        })?;

        // ── Extract headers ─────────────────────────────────────────────
        let header_sel = Self::parse_selector(&self.header_row_selector)?;
        let headers: Vec<String> = table_element
            .select(&header_sel)
            .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_owned())
            .collect();

        if headers.is_empty() {
            return Err(ScrapeError::Parse(
                "no header cells found in table".to_owned(),
            ));
        }

        // ── Extract body rows ───────────────────────────────────────────
        let row_sel = Self::parse_selector(&self.body_row_selector)?;
        let cell_sel = Self::parse_selector(&self.cell_selector)?;

        let mut records: Vec<serde_json::Value> = Vec::new();

        for row in table_element.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();

            if cells.is_empty() {
                continue;
            }

            let mut map = serde_json::Map::new();
            for (i, header) in headers.iter().enumerate() {
                let value = cells.get(i).cloned().unwrap_or_default();
                map.insert(header.clone(), serde_json::Value::String(value));
            }

            records.push(serde_json::Value::Object(map));
        }

        Ok(records)
    }
}

/// Text content of a cell with inner markup flattened and whitespace
/// collapsed.
fn cell_text(cell: scraper::ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Scraper for HtmlTableScraper {
    async fn fetch_page(&self, page: u32) -> Result<ScrapedPage, ScrapeError> {
        // The member table is published as a single page.
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
        let body = response.text().await?;

        let records = self.parse_table(&body)?;

        log::info!(
            "Parsed {} rows from table at {}",
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
        "html_table"
    }
}

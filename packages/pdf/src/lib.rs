#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Contact record extraction from parliamentary members directories.
//!
//! The Senate and House of Representatives publish their member
//! directories only as PDFs. Text extraction ([`pdf_extract`]) keeps the
//! rows but loses the table structure: columns drift, names wrap across
//! lines in either order, and labels appear at varying offsets. This
//! crate rebuilds one [`ContactRecord`] per legislator from that text in
//! three stages:
//!
//! 1. [`classifier`] and [`blocks`] partition the lines into one block per
//!    legislator;
//! 2. [`senate`] and [`representatives`] pull typed fields out of each
//!    block, using [`label_field`] for labelled values;
//! 3. [`parse_document`] folds the records into a phone-keyed
//!    [`RecordMap`].
//!
//! Column positions and label tokens come from a [`DocumentLayout`]
//! rather than from code.

pub mod blocks;
pub mod classifier;
pub mod download;
pub mod label_field;
pub mod layout;
pub mod lines;
pub mod representatives;
pub mod senate;

use parl_contacts_models::{ContactRecord, RecordMap, Role};
use parl_contacts_scraper::{ScrapeConfig, ScrapeError, ScrapedPage, Scraper};

pub use layout::{
    DocumentLayout, default_layout, load_layout_file, parse_layout_toml, render_layout,
};

use crate::blocks::{assemble_representative_blocks, assemble_senate_blocks};
use crate::download::fetch_document_text;
use crate::layout::SenateLayout;
use crate::lines::{Block, Line, document_lines};
use crate::representatives::RepresentativeReader;
use crate::senate::extract_senator;

/// Errors specific to PDF directory extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An HTTP request to download a PDF failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// A layout produced an invalid pattern.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A layout file could not be parsed.
    #[error("Invalid layout: {0}")]
    Layout(#[from] toml::de::Error),

    /// A layout could not be rendered back to TOML.
    #[error("Layout serialization error: {0}")]
    LayoutSerialize(#[from] toml::ser::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The download request could not be set up.
    #[error("Source error: {0}")]
    Source(#[from] ScrapeError),

    /// A non-empty document produced no blocks at all, which means its
    /// layout no longer matches the heuristics.
    #[error("no {role} entries found in a {line_count}-line document")]
    NoBlocks {
        /// Role the document was parsed as.
        role: Role,
        /// Number of lines in the document.
        line_count: usize,
    },
}

impl From<PdfError> for ScrapeError {
    fn from(e: PdfError) -> Self {
        Self::Parse(e.to_string())
    }
}

/// The outcome of parsing one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Role the document was parsed as.
    pub role: Role,
    /// Recovered records keyed by phone number.
    pub records: RecordMap,
    /// Number of blocks assembled from the text.
    pub blocks: usize,
    /// Blocks that did not yield every required field.
    pub dropped: usize,
    /// Records the layout expects a complete parse to yield.
    pub expected_records: Option<usize>,
}

impl ParsedDocument {
    /// How many records short of the layout's expectation this parse is.
    ///
    /// `None` if the layout has no expectation or the parse met it.
    #[must_use]
    pub fn shortfall(&self) -> Option<usize> {
        self.expected_records
            .and_then(|expected| expected.checked_sub(self.records.len()))
            .filter(|&missing| missing > 0)
    }
}

/// Parses the extracted text of a members directory.
///
/// Blocks that do not yield a surname, phone and electorate/state are
/// dropped; a record whose phone was already seen is dropped too, keeping
/// the first.
///
/// # Errors
///
/// * [`PdfError::NoBlocks`] if the text has content but no entry could be
///   delimited.
/// * [`PdfError::Regex`] if the layout's patterns do not compile.
pub fn parse_document(text: &str, layout: &DocumentLayout) -> Result<ParsedDocument, PdfError> {
    let role = layout.role();
    let lines = document_lines(text);
    let extractor = Extractor::new(layout)?;
    let blocks = extractor.assemble(&lines);

    if blocks.is_empty() {
        if text.trim().is_empty() {
            log::warn!("Empty {role} document, nothing to extract");
        } else {
            return Err(PdfError::NoBlocks {
                role,
                line_count: lines.len(),
            });
        }
    }

    let mut records = RecordMap::new();
    let mut dropped = 0_usize;

    for block in &blocks {
        let Some(record) = extractor.extract(block) else {
            dropped += 1;
            log::debug!(
                "Dropping unparseable {role} block at line {}: {:?}",
                block.first().index,
                block.first().text.trim()
            );
            continue;
        };

        if let Some(existing) = records.get(&record.phone) {
            dropped += 1;
            log::warn!(
                "Duplicate phone {} for {} (already used by {}), keeping the first",
                record.phone,
                record.surname,
                existing.surname
            );
            continue;
        }

        records.insert(record.phone.clone(), record);
    }

    let parsed = ParsedDocument {
        role,
        records,
        blocks: blocks.len(),
        dropped,
        expected_records: layout.expected_records(),
    };

    log::info!(
        "Extracted {} {role} records from {} blocks ({dropped} dropped)",
        parsed.records.len(),
        parsed.blocks
    );

    if let Some(missing) = parsed.shortfall() {
        log::warn!(
            "{role} directory is {missing} record(s) short of the {} expected",
            parsed.expected_records.unwrap_or_default()
        );
    }

    Ok(parsed)
}

/// Block assembly and field extraction for one role.
enum Extractor<'a> {
    Senate(&'a SenateLayout),
    Representative(RepresentativeReader<'a>),
}

impl<'a> Extractor<'a> {
    fn new(layout: &'a DocumentLayout) -> Result<Self, PdfError> {
        Ok(match layout {
            DocumentLayout::Senator(layout) => Self::Senate(layout),
            DocumentLayout::Representative(layout) => {
                Self::Representative(RepresentativeReader::new(layout)?)
            }
        })
    }

    fn assemble<'t>(&self, lines: &[Line<'t>]) -> Vec<Block<'t>> {
        match self {
            Self::Senate(_) => assemble_senate_blocks(lines),
            Self::Representative(reader) => assemble_representative_blocks(lines, reader),
        }
    }

    fn extract(&self, block: &Block<'_>) -> Option<ContactRecord> {
        match self {
            Self::Senate(layout) => extract_senator(block, layout),
            Self::Representative(reader) => reader.extract(block),
        }
    }
}

/// A scraper that downloads a members directory and extracts its records.
///
/// Implements [`Scraper`] so a directory can be fetched in the same
/// pipeline as the CSV listing and the web table. Each record is returned
/// as its flattened JSON object.
#[derive(Debug, Clone)]
pub struct DirectoryScraper {
    /// URL of the directory PDF and the request headers.
    config: ScrapeConfig,
    /// How to read the directory.
    layout: DocumentLayout,
}

impl DirectoryScraper {
    /// Creates a scraper for the directory at `url` using the embedded
    /// layout for `role`.
    #[must_use]
    pub fn new(url: &str, role: Role) -> Self {
        Self::with_layout(url, default_layout(role))
    }

    /// Creates a scraper for the directory at `url` with a custom layout.
    #[must_use]
    pub fn with_layout(url: &str, layout: DocumentLayout) -> Self {
        Self {
            config: ScrapeConfig::new(url),
            layout,
        }
    }

    /// Adds an HTTP header to include in the download request.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.config = self.config.with_header(key, value);
        self
    }

    /// The layout the directory is read with.
    #[must_use]
    pub const fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Downloads and parses the directory.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the download, text extraction or parse
    /// fails.
    pub async fn fetch_document(&self) -> Result<ParsedDocument, PdfError> {
        let text = fetch_document_text(&self.config).await?;
        parse_document(&text, &self.layout)
    }
}

impl Scraper for DirectoryScraper {
    async fn fetch_page(&self, page: u32) -> Result<ScrapedPage, ScrapeError> {
        // A directory is a single document.
        if page > 0 {
            return Ok(ScrapedPage {
                records: Vec::new(),
                has_more: false,
                page_number: page,
            });
        }

        let parsed = self.fetch_document().await?;
        let records = parsed
            .records
            .values()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ScrapeError::Parse(format!("failed to serialize record: {e}")))?;

        log::info!("Extracted {} records from directory {}", records.len(), self.config.url);

        Ok(ScrapedPage {
            records,
            has_more: false,
            page_number: 0,
        })
    }

    fn strategy(&self) -> &'static str {
        "pdf_directory"
    }
}

//! Fetch, parse and merge steps shared by the subcommands and the
//! interactive menu.
//!
//! The member listing CSV is the base record set. The web table and the
//! two PDF directories are each keyed by phone number and merged into it;
//! a secondary source that fails to download is logged and skipped rather
//! than aborting the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use parl_contacts_cli_utils::{IndicatifProgress, MultiProgress};
use parl_contacts_models::Role;
use parl_contacts_pdf::{DirectoryScraper, DocumentLayout, ParsedDocument};
use parl_contacts_scraper::csv_download::CsvDownloadScraper;
use parl_contacts_scraper::html_table::HtmlTableScraper;
use parl_contacts_scraper::keyed::{KeyedRows, key_by_phone};
use parl_contacts_scraper::merge::merge_into;
use parl_contacts_scraper::progress::{ProgressCallback, null_progress};
use parl_contacts_scraper::{Scraper, scrape_all};
use serde::Serialize;

/// Field holding the phone number in a serialized contact record.
const RECORD_PHONE_FIELD: &str = "phone";

/// Sent with every download.
const USER_AGENT: &str = concat!("parl_contacts/", env!("CARGO_PKG_VERSION"));

/// Where each source of a merge run lives.
#[derive(Debug, Clone)]
pub struct ScrapeSources {
    /// URL of the member listing CSV.
    pub csv_url: String,
    /// Phone column of the CSV.
    pub csv_phone_column: String,
    /// Whether the CSV is gzip-compressed.
    pub csv_gzip: bool,
    /// Field delimiter of the CSV.
    pub csv_delimiter: u8,
    /// URL of the page holding the web member table.
    pub web_url: Option<String>,
    /// CSS selector of the member table.
    pub web_table_selector: String,
    /// Phone column of the web table.
    pub web_phone_column: String,
    /// URL of the Senate directory PDF.
    pub senate_url: Option<String>,
    /// Layout TOML for the Senate directory instead of the embedded one.
    pub senate_layout: Option<PathBuf>,
    /// URL of the House of Representatives directory PDF.
    pub representatives_url: Option<String>,
    /// Layout TOML for the House of Representatives directory instead of
    /// the embedded one.
    pub representatives_layout: Option<PathBuf>,
}

impl ScrapeSources {
    /// The directory URLs that were given, with their roles and layout
    /// overrides.
    fn directories(&self) -> Vec<(Role, &str, Option<&Path>)> {
        [
            (
                Role::Senator,
                self.senate_url.as_deref(),
                self.senate_layout.as_deref(),
            ),
            (
                Role::Representative,
                self.representatives_url.as_deref(),
                self.representatives_layout.as_deref(),
            ),
        ]
        .into_iter()
        .filter_map(|(role, url, layout)| url.map(|url| (role, url, layout)))
        .collect()
    }

    /// Builds a scraper for every configured directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout override cannot be loaded or describes
    /// the other chamber's directory.
    fn directory_scrapers(
        &self,
    ) -> Result<Vec<(Role, DirectoryScraper)>, Box<dyn std::error::Error>> {
        self.directories()
            .into_iter()
            .map(|(role, url, layout)| -> Result<_, Box<dyn std::error::Error>> {
                let layout = resolve_layout(role, layout)?;
                let scraper =
                    DirectoryScraper::with_layout(url, layout).with_header("User-Agent", USER_AGENT);
                Ok((role, scraper))
            })
            .collect()
    }

    /// Number of sources that will be fetched, including the base CSV.
    fn count(&self) -> usize {
        1 + usize::from(self.web_url.is_some()) + self.directories().len()
    }
}

/// Returns the layout for `role`, read from `path` when one is given.
///
/// # Errors
///
/// Returns an error if the layout file cannot be loaded or describes the
/// other chamber's directory.
pub fn resolve_layout(
    role: Role,
    path: Option<&Path>,
) -> Result<DocumentLayout, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(parl_contacts_pdf::default_layout(role));
    };

    let layout = parl_contacts_pdf::load_layout_file(path)?;
    if layout.role() != role {
        return Err(format!(
            "layout {} describes a {} directory, not a {role} directory",
            path.display(),
            layout.role()
        )
        .into());
    }

    Ok(layout)
}

/// Downloads and parses one directory behind a spinner.
///
/// # Errors
///
/// Returns an error if the download, text extraction or parse fails.
pub async fn fetch_directory(
    multi: &MultiProgress,
    url: &str,
    layout: DocumentLayout,
) -> Result<ParsedDocument, Box<dyn std::error::Error>> {
    let role = layout.role();
    let spinner = IndicatifProgress::spinner(multi, &format!("Fetching {role} directory"));

    let result = DirectoryScraper::with_layout(url, layout)
        .with_header("User-Agent", USER_AGENT)
        .fetch_document()
        .await;

    match &result {
        Ok(parsed) => spinner.finish(format!(
            "Extracted {} {role} records ({} dropped)",
            parsed.records.len(),
            parsed.dropped
        )),
        Err(_) => spinner.finish_and_clear(),
    }

    Ok(result?)
}

/// Fetches every source and merges them into the base CSV listing.
///
/// Pass `None` for `multi` to run without progress bars.
///
/// # Errors
///
/// Returns an error if a directory layout override is unusable or the
/// base CSV cannot be fetched. Failures of the other sources are logged
/// and skipped.
pub async fn scrape(
    multi: Option<&MultiProgress>,
    sources: &ScrapeSources,
) -> Result<KeyedRows, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let total = sources.count();
    let directories = sources.directory_scrapers()?;

    let steps = multi.map_or_else(null_progress, |multi| {
        IndicatifProgress::steps_bar(multi, "Sources", total as u64)
    });

    steps.set_message("Member listing CSV".to_owned());
    let csv = CsvDownloadScraper::new(&sources.csv_url)
        .with_gzip(sources.csv_gzip)
        .with_delimiter(sources.csv_delimiter)
        .with_header("User-Agent", USER_AGENT);
    let rows = match scrape_all(&csv, None).await {
        Ok(rows) => rows,
        Err(e) => {
            steps.finish_and_clear();
            return Err(e.into());
        }
    };
    let mut merged = key_by_phone(rows, &sources.csv_phone_column);
    log::info!("{} members in the base listing", merged.len());
    steps.inc(1);

    if let Some(url) = &sources.web_url {
        let scraper = HtmlTableScraper::new(url)
            .with_table_selector(&sources.web_table_selector)
            .with_header("User-Agent", USER_AGENT);
        merge_source(
            steps.as_ref(),
            "Web member table",
            &scraper,
            &sources.web_phone_column,
            &mut merged,
        )
        .await;
    }

    for (role, scraper) in &directories {
        merge_source(
            steps.as_ref(),
            &format!("{role} directory"),
            scraper,
            RECORD_PHONE_FIELD,
            &mut merged,
        )
        .await;
    }

    steps.finish(format!(
        "Merged {total} source(s) in {:.1}s",
        start.elapsed().as_secs_f64()
    ));

    Ok(merged)
}

/// Fetches one secondary source and merges it into `merged`.
async fn merge_source(
    progress: &dyn ProgressCallback,
    label: &str,
    scraper: &impl Scraper,
    phone_column: &str,
    merged: &mut KeyedRows,
) {
    progress.set_message(label.to_owned());

    match scrape_all(scraper, None).await {
        Ok(rows) => {
            let keyed = key_by_phone(rows, phone_column);
            let matched = merge_into(merged, &keyed);
            log::info!(
                "{label}: {} rows, {matched} matched the base listing",
                keyed.len()
            );
        }
        Err(e) => log::error!("Failed to fetch {label}, skipping it: {e}"),
    }

    progress.inc(1);
}

/// Writes `value` as pretty JSON to `output`, or to stdout.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_json(
    value: &impl Serialize,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> ScrapeSources {
        ScrapeSources {
            csv_url: "https://example.org/members.csv".to_owned(),
            csv_phone_column: "Phone".to_owned(),
            csv_gzip: false,
            csv_delimiter: b',',
            web_url: None,
            web_table_selector: "table".to_owned(),
            web_phone_column: "Phone".to_owned(),
            senate_url: None,
            senate_layout: None,
            representatives_url: Some("https://example.org/members.pdf".to_owned()),
            representatives_layout: None,
        }
    }

    fn temp_layout_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "parl_contacts_cli_{name}_{}.toml",
            std::process::id()
        ))
    }

    #[test]
    fn counts_only_configured_sources() {
        let sources = sources();
        assert_eq!(sources.count(), 2);
        assert_eq!(
            sources.directories(),
            vec![(Role::Representative, "https://example.org/members.pdf", None)]
        );
    }

    #[test]
    fn directory_scrapers_use_layout_overrides() {
        let path = temp_layout_path("merge_layout");
        let mut layout = parl_contacts_pdf::default_layout(Role::Representative);
        if let DocumentLayout::Representative(representatives) = &mut layout {
            representatives.expected_records = Some(150);
        }
        std::fs::write(&path, parl_contacts_pdf::render_layout(&layout).unwrap()).unwrap();

        let mut sources = sources();
        sources.representatives_layout = Some(path.clone());
        let scrapers = sources.directory_scrapers();
        std::fs::remove_file(&path).unwrap();

        let scrapers = scrapers.unwrap();
        assert_eq!(scrapers.len(), 1);
        assert_eq!(scrapers[0].0, Role::Representative);
        assert_eq!(scrapers[0].1.layout().expected_records(), Some(150));
    }

    #[test]
    fn directory_scrapers_default_to_embedded_layouts() {
        let scrapers = sources().directory_scrapers().unwrap();
        assert_eq!(
            scrapers[0].1.layout(),
            &parl_contacts_pdf::default_layout(Role::Representative)
        );
    }

    #[tokio::test]
    async fn merge_run_rejects_layout_for_the_other_chamber() {
        let path = temp_layout_path("merge_wrong_layout");
        let senate = parl_contacts_pdf::default_layout(Role::Senator);
        std::fs::write(&path, parl_contacts_pdf::render_layout(&senate).unwrap()).unwrap();

        let mut sources = sources();
        sources.representatives_layout = Some(path.clone());
        let result = scrape(None, &sources).await;
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("not a representative directory"));
    }

    #[test]
    fn default_layout_is_used_without_a_file() {
        let layout = resolve_layout(Role::Senator, None).unwrap();
        assert_eq!(layout.role(), Role::Senator);
    }

    #[test]
    fn rejects_layout_for_the_other_chamber() {
        let path = temp_layout_path("layout");
        let senate = parl_contacts_pdf::default_layout(Role::Senator);
        std::fs::write(&path, parl_contacts_pdf::render_layout(&senate).unwrap()).unwrap();

        let result = resolve_layout(Role::Representative, Some(&path));
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("not a representative directory"));
    }

    #[test]
    fn writes_json_to_a_file() {
        let path = std::env::temp_dir().join(format!(
            "parl_contacts_cli_output_{}.json",
            std::process::id()
        ));
        let records = parl_contacts_pdf::parse_document(
            "1      Abetz, Senator the Hon Eric                   TAS         LP      Highbury House, 136 Davey Street,                 (03) 6224 3707\n",
            &parl_contacts_pdf::default_layout(Role::Senator),
        )
        .unwrap()
        .records;

        write_json(&records, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["(03) 6224 3707"]["state"], "TAS");
        assert_eq!(value["(03) 6224 3707"]["surname"], "Abetz");
    }
}

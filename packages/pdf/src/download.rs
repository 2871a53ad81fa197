//! Directory download and text extraction.
//!
//! The parliamentary directories are published as PDFs. These helpers
//! fetch one over HTTP and hand back the plain text [`pdf_extract`]
//! recovers from it, which is what [`crate::parse_document`] consumes.

use std::path::Path;

use parl_contacts_scraper::ScrapeConfig;

use crate::PdfError;

/// Downloads the directory PDF at `config.url` and extracts its text.
///
/// # Errors
///
/// Returns [`PdfError::Source`] if the configured headers are invalid,
/// [`PdfError::Http`] if the download fails or the server answers with an
/// error status, and [`PdfError::Extraction`] if the body is not a
/// readable PDF.
pub async fn fetch_document_text(config: &ScrapeConfig) -> Result<String, PdfError> {
    let client = config.build_client()?;
    let url = &config.url;
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    let text = extract_text(&bytes)?;

    log::debug!("Extracted {} characters of text from {url}", text.len());

    Ok(text)
}

/// Extracts the text of an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))
}

/// Reads a directory from disk.
///
/// Files with a `.pdf` extension are run through text extraction; anything
/// else is assumed to already be extracted text.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read and
/// [`PdfError::Extraction`] if a PDF cannot be decoded.
pub fn read_document_text(path: &Path) -> Result<String, PdfError> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        extract_text(&bytes)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use parl_contacts_scraper::ScrapeError;

    #[tokio::test]
    async fn invalid_headers_fail_before_downloading() {
        let config = ScrapeConfig::new("http://localhost:9/senators.pdf")
            .with_header("bad header", "value");
        let err = fetch_document_text(&config).await.unwrap_err();
        assert!(matches!(
            err,
            PdfError::Source(ScrapeError::Parse(msg)) if msg.contains("bad header")
        ));
    }

    #[test]
    fn garbage_bytes_are_not_a_pdf() {
        let err = extract_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Extraction(_)));
    }

    #[test]
    fn reads_plain_text_files_verbatim() {
        let path = std::env::temp_dir().join(format!(
            "parl_contacts_pdf_read_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "1      Abetz, Senator the Hon Eric\n").unwrap();

        let text = read_document_text(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(text, "1      Abetz, Senator the Hon Eric\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_document_text(Path::new("/nonexistent/senators.txt")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}

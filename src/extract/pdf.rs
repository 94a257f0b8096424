//! PDF text extraction with `lopdf`.

use std::path::Path;

use lopdf::Document;

use super::{DocumentExtractor, ExtractError, RawDocumentText};

/// Extracts per-page text from PDF files.
///
/// A page whose text cannot be decoded is logged and kept as an empty page
/// so page positions stay aligned with the source document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<RawDocumentText, ExtractError> {
        std::fs::metadata(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let doc = Document::load(path).map_err(|e| ExtractError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            log::warn!("extract: {} is encrypted; text may be unreadable", path.display());
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let total = page_numbers.len();
        log::info!("extract: processing {total} pages");

        let pages = page_numbers
            .iter()
            .enumerate()
            .map(|(i, &page)| {
                log::debug!("extract: page {}/{total}", i + 1);
                doc.extract_text(&[page]).unwrap_or_else(|e| {
                    log::warn!("extract: page {page} unreadable ({e}); skipping its text");
                    String::new()
                })
            })
            .collect();

        log::info!("extract: text extraction completed");
        Ok(RawDocumentText::new(pages))
    }
}

//! Document text extraction.
//!
//! [`DocumentExtractor`] turns a file into ordered page texts
//! ([`RawDocumentText`]).  [`PdfExtractor`] is the production backend,
//! built on `lopdf`.

pub mod pdf;

pub use pdf::PdfExtractor;

use std::path::Path;

use thiserror::Error;

/// Separator placed between pages when they are joined.
pub const PAGE_SEPARATOR: &str = "\n\n";

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid document of the expected format.
    #[error("cannot parse document: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// RawDocumentText
// ---------------------------------------------------------------------------

/// Page texts in document order, exactly as the extractor produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocumentText {
    pages: Vec<String>,
}

impl RawDocumentText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// `true` when no page carries any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }

    /// All pages, each followed by [`PAGE_SEPARATOR`].
    pub fn joined(&self) -> String {
        let mut out = String::with_capacity(
            self.pages.iter().map(|p| p.len() + PAGE_SEPARATOR.len()).sum(),
        );
        for page in &self.pages {
            out.push_str(page);
            out.push_str(PAGE_SEPARATOR);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// DocumentExtractor trait
// ---------------------------------------------------------------------------

/// Object-safe interface for document readers.
pub trait DocumentExtractor: Send + Sync {
    /// Read `path` and return its page texts.
    fn extract(&self, path: &Path) -> Result<RawDocumentText, ExtractError>;
}

// Compile-time assertion: Box<dyn DocumentExtractor> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DocumentExtractor>) {}
};

// ---------------------------------------------------------------------------
// MockExtractor  (test-only)
// ---------------------------------------------------------------------------

/// A test double that serves page text by file name, regardless of the
/// file's actual contents.  Unregistered names fail with a parse error.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MockExtractor {
    documents: std::collections::HashMap<String, Vec<String>>,
}

#[cfg(test)]
impl MockExtractor {
    pub(crate) fn with(mut self, file_name: &str, pages: &[&str]) -> Self {
        self.documents.insert(
            file_name.to_string(),
            pages.iter().map(|p| p.to_string()).collect(),
        );
        self
    }
}

#[cfg(test)]
impl DocumentExtractor for MockExtractor {
    fn extract(&self, path: &Path) -> Result<RawDocumentText, ExtractError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.documents
            .get(name)
            .map(|pages| RawDocumentText::new(pages.clone()))
            .ok_or_else(|| ExtractError::Parse(format!("no mock document for {name}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

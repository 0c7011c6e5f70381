//! Page text sources.
//!
//! Every source turns a document into an ordered list of page texts, which is
//! the only input the extraction layer needs.

mod plain;
#[cfg(feature = "pdf")]
mod pdf;

pub use plain::PlainTextSource;
#[cfg(feature = "pdf")]
pub use pdf::PdfTextSource;

use std::path::Path;

use tracing::debug;

use crate::error::SourceError;
use crate::models::config::SourceConfig;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Trait for document formats that yield page text.
pub trait TextSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of one page (1-indexed).
    fn page_text(&self, page: usize) -> Result<String>;

    /// Text of every page in order.
    fn pages(&self) -> Result<Vec<String>> {
        (1..=self.page_count()).map(|page| self.page_text(page)).collect()
    }
}

/// Pick a source for a file by its extension.
pub fn source_for_path(path: &Path, config: &SourceConfig) -> Result<Box<dyn TextSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "pdf")]
        "pdf" => Ok(Box::new(PdfTextSource::new())),
        "txt" | "text" | "md" => Ok(Box::new(PlainTextSource::new(&config.page_separator))),
        _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read a document and return its page texts.
///
/// Applies `max_pages` and fails with [`SourceError::NoPages`] when the whole
/// document has less than `min_text_length` characters of text.
pub fn load_pages(path: &Path, config: &SourceConfig) -> Result<Vec<String>> {
    let mut source = source_for_path(path, config)?;
    let data = std::fs::read(path)?;
    source.load(&data)?;

    let mut pages = source.pages()?;
    if config.max_pages > 0 && pages.len() > config.max_pages {
        debug!("Keeping first {} of {} pages", config.max_pages, pages.len());
        pages.truncate(config.max_pages);
    }

    let text_length: usize = pages.iter().map(|p| p.trim().chars().count()).sum();
    if pages.is_empty() || text_length < config.min_text_length {
        return Err(SourceError::NoPages);
    }

    debug!("Loaded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

//! PDF page text using lopdf, with pdf-extract as a fallback.

use lopdf::Document;
use tracing::{debug, warn};

use super::{Result, TextSource};
use crate::error::SourceError;

/// Reads text page by page from a PDF's content streams.
pub struct PdfTextSource {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfTextSource {
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| SourceError::Parse("No document loaded".to_string()))
    }

    /// Whole-document text from pdf-extract, split on form feeds when that
    /// gives one piece per page.
    fn fallback_pages(&self) -> Result<Vec<String>> {
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

        let mut pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        if pages.len() == self.page_count() {
            Ok(pages)
        } else {
            debug!(
                "Fallback text has {} parts for {} pages, using one page",
                pages.len(),
                self.page_count()
            );
            Ok(vec![text])
        }
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextSource {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len())
            .unwrap_or(0)
    }

    fn page_text(&self, page: usize) -> Result<String> {
        let doc = self.document()?;
        let number = u32::try_from(page).map_err(|_| SourceError::InvalidPage(page))?;
        if !doc.get_pages().contains_key(&number) {
            return Err(SourceError::InvalidPage(page));
        }

        doc.extract_text(&[number])
            .map_err(|e| SourceError::TextExtraction(e.to_string()))
    }

    fn pages(&self) -> Result<Vec<String>> {
        let per_page: Result<Vec<String>> = (1..=self.page_count()).map(|page| self.page_text(page)).collect();

        match per_page {
            Ok(pages) if pages.iter().any(|p| !p.trim().is_empty()) => Ok(pages),
            Ok(_) => {
                debug!("No text from content streams, trying pdf-extract");
                self.fallback_pages()
            }
            Err(e) => {
                warn!("Per-page text extraction failed, trying pdf-extract: {}", e);
                self.fallback_pages()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_source_new() {
        let source = PdfTextSource::new();
        assert!(source.document.is_none());
        assert_eq!(source.page_count(), 0);
        assert!(matches!(source.page_text(1), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut source = PdfTextSource::new();
        assert!(matches!(source.load(b"not a pdf"), Err(SourceError::Parse(_))));
    }
}

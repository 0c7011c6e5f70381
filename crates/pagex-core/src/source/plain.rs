//! Plain text documents with a page separator.

use tracing::debug;

use super::{Result, TextSource};
use crate::error::SourceError;

/// Text split into pages on a separator (form feed by default).
///
/// A single trailing empty page, as left by `pdftotext`, is dropped. An empty
/// separator keeps the whole text as one page.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    separator: String,
    pages: Vec<String>,
}

impl PlainTextSource {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
            pages: Vec::new(),
        }
    }

    /// Load from a string without going through bytes.
    pub fn from_text(text: &str, separator: &str) -> Self {
        let mut source = Self::new(separator);
        source.pages = source.split(text);
        source
    }

    fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if self.separator.is_empty() {
            return vec![text.to_string()];
        }

        let mut pages: Vec<String> = text.split(self.separator.as_str()).map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        pages
    }
}

impl Default for PlainTextSource {
    fn default() -> Self {
        Self::new("\u{c}")
    }
}

impl TextSource for PlainTextSource {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(data).map_err(|e| SourceError::Parse(e.to_string()))?;
        self.pages = self.split(text);
        debug!("Loaded text with {} pages", self.pages.len());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .cloned()
            .ok_or(SourceError::InvalidPage(page))
    }

    fn pages(&self) -> Result<Vec<String>> {
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_on_form_feed() {
        let mut source = PlainTextSource::default();
        source.load(b"one\x0ctwo\x0c\x0cfour").unwrap();

        assert_eq!(source.page_count(), 4);
        assert_eq!(source.page_text(3).unwrap(), "");
        assert_eq!(source.page_text(4).unwrap(), "four");
    }

    #[test]
    fn test_custom_separator() {
        let source = PlainTextSource::from_text("a\n---\nb", "\n---\n");
        assert_eq!(source.pages().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_page() {
        let source = PlainTextSource::from_text("only", "\u{c}");
        assert!(matches!(source.page_text(0), Err(SourceError::InvalidPage(0))));
        assert!(matches!(source.page_text(2), Err(SourceError::InvalidPage(2))));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut source = PlainTextSource::default();
        assert!(matches!(source.load(&[0xff, 0xfe]), Err(SourceError::Parse(_))));
    }
}

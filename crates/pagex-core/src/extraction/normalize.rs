//! Page normalization before matching.
//!
//! A normalizer may be backed by an external service (an LLM cleanup pass,
//! for instance). Failures never abort extraction: the aggregator logs them
//! and matches the raw page text instead.

use crate::error::NormalizeError;

use super::rules::patterns::{MARKDOWN_EMPHASIS, MARKDOWN_HEADING};

/// Rewrites page text before segmentation and matching.
pub trait PageNormalizer: Send + Sync {
    /// Normalize one page.
    fn normalize(&self, text: &str) -> Result<String, NormalizeError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Strips markdown emphasis (`**`, `__`) and heading markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCleaner;

impl PageNormalizer for MarkdownCleaner {
    fn normalize(&self, text: &str) -> Result<String, NormalizeError> {
        let text = MARKDOWN_HEADING.replace_all(text, "");
        Ok(MARKDOWN_EMPHASIS.replace_all(&text, "").into_owned())
    }

    fn name(&self) -> &str {
        "markdown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_cleaner() {
        let text = "# Invoice\n**Customer:** Jane Doe\n## __Totals__\nTotal: $5 # not a heading";
        let cleaned = MarkdownCleaner.normalize(text).unwrap();
        assert_eq!(cleaned, "Invoice\nCustomer: Jane Doe\nTotals\nTotal: $5 # not a heading");
    }
}

//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PagexError;
use crate::models::field::MatchStrategy;

/// Main configuration for pagex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagexConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Page text source configuration.
    pub source: SourceConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fuzzy key matches must score strictly above this ratio (0.0 - 1.0).
    pub similarity_threshold: f64,

    /// Maximum characters kept from a keyword-fallback value.
    pub max_value_chars: usize,

    /// Anchor regex used in record mode when the request carries none.
    pub anchor_pattern: Option<String>,

    /// Strategies enabled in record mode.
    pub record_strategies: Vec<MatchStrategy>,

    /// Strategies enabled in flat mode.
    pub flat_strategies: Vec<MatchStrategy>,

    /// Attach "could not extract" diagnostics to page results.
    pub include_messages: bool,

    /// Echo each page's matched (normalized) text in its result.
    pub include_page_text: bool,

    /// Remove markdown emphasis and heading markers before matching.
    pub strip_markdown: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            max_value_chars: 100,
            anchor_pattern: Some(r"INV[- ]?\d+".to_string()),
            record_strategies: vec![MatchStrategy::Typed, MatchStrategy::FuzzyKey],
            flat_strategies: vec![MatchStrategy::FuzzyKey, MatchStrategy::Keyword],
            include_messages: true,
            include_page_text: false,
            strip_markdown: true,
        }
    }
}

/// Page text source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Separator between pages in plain text input.
    pub page_separator: String,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Minimum trimmed text length for a document to count as non-empty.
    pub min_text_length: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_separator: "\u{c}".to_string(),
            max_pages: 0,
            min_text_length: 1,
        }
    }
}

impl PagexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PagexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| PagexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PagexConfig =
            serde_json::from_str(r#"{"extraction": {"similarity_threshold": 0.8}}"#).unwrap();

        assert_eq!(config.extraction.similarity_threshold, 0.8);
        assert_eq!(config.extraction.max_value_chars, 100);
        assert_eq!(
            config.extraction.flat_strategies,
            vec![MatchStrategy::FuzzyKey, MatchStrategy::Keyword]
        );
        assert_eq!(config.source, SourceConfig::default());
    }

    #[test]
    fn test_file_round_trip_and_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pagex.json");

        let mut config = PagexConfig::default();
        config.extraction.anchor_pattern = Some(r"ORD-\d+".to_string());
        config.save(&path).unwrap();
        assert_eq!(PagexConfig::from_file(&path).unwrap(), config);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(PagexConfig::from_file(&path), Err(PagexError::Config(_))));
        assert!(matches!(
            PagexConfig::from_file(&dir.path().join("missing.json")),
            Err(PagexError::Io(_))
        ));
    }

    #[test]
    fn test_strategies_serialize_snake_case() {
        let json = serde_json::to_value(ExtractionConfig::default()).unwrap();
        assert_eq!(json["record_strategies"], serde_json::json!(["typed", "fuzzy_key"]));
    }
}

//! Labeled party-name extraction ("Customer: Jane Doe", "Bill To - Acme").

use super::patterns::{NAME_LABELED, WHITESPACE_RUN};
use super::{match_in_text, ExtractionMatch, FieldExtractor};

/// Name field extractor.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        NAME_LABELED.captures_iter(text).find_map(|caps| name_match(text, &caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        NAME_LABELED
            .captures_iter(text)
            .filter_map(|caps| name_match(text, &caps))
            .collect()
    }
}

fn name_match(text: &str, caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
    let full = caps.get(0)?;
    let name = clean_name(caps.get(1)?.as_str());
    if name.is_empty() {
        return None;
    }
    Some(match_in_text(name, text, full.start(), full.end()))
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn clean_name(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

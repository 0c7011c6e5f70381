//! Rule-based field matchers.

pub mod amounts;
pub mod dates;
pub mod fuzzy;
pub mod keyword;
pub mod names;
pub mod patterns;
pub mod similarity;

pub use amounts::{normalize_currency, parse_amount, CurrencyExtractor};
pub use dates::{parse_date, DateExtractor};
pub use fuzzy::{split_key_value, FuzzyKeyMatcher};
pub use keyword::KeywordMatcher;
pub use names::{clean_name, NameExtractor};
pub use similarity::similarity_ratio;

use crate::models::field::FieldCategory;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Similarity score, set by fuzzy matching only.
    pub confidence: Option<f64>,
    /// Byte position in source text.
    pub position: Option<(usize, usize)>,
    /// Raw line the value was taken from.
    pub source: String,
    /// 1-based line number of `source`.
    pub line_number: Option<usize>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence: None,
            position: None,
            source: source.into(),
            line_number: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Build a match for a regex hit, recording its enclosing line.
pub(crate) fn match_in_text(
    value: String,
    text: &str,
    start: usize,
    end: usize,
) -> ExtractionMatch<String> {
    let (line_number, line) = line_at(text, start);
    ExtractionMatch::new(value, line.trim())
        .with_position(start, end)
        .with_line_number(line_number)
}

/// Lines of `text`, broken at `\r\n`, `\r` or `\n`.
///
/// A trailing line break does not start an extra empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(i) => {
                let line = &rest[..i];
                let width = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + width..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

/// 1-based line number and content of the line containing byte `pos`.
pub fn line_at(text: &str, pos: usize) -> (usize, &str) {
    let pos = pos.min(text.len());
    let line_start = text[..pos].rfind(['\r', '\n']).map(|i| i + 1).unwrap_or(0);
    let line_end = text[pos..].find(['\r', '\n']).map(|i| pos + i).unwrap_or(text.len());
    let line_number = split_lines(&text[..line_start]).count() + 1;
    (line_number, &text[line_start..line_end])
}

/// Run the typed extractor for a category, if it has one.
pub fn typed_match(category: FieldCategory, text: &str) -> Option<ExtractionMatch<String>> {
    match category {
        FieldCategory::Date => DateExtractor::new().extract(text),
        FieldCategory::Currency => CurrencyExtractor::new().extract(text),
        FieldCategory::Name => NameExtractor::new().extract(text),
        FieldCategory::Generic => None,
    }
}

/// Truncate to at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_at() {
        let text = "first\nsecond line\r\nthird";
        assert_eq!(line_at(text, 0), (1, "first"));
        assert_eq!(line_at(text, 8), (2, "second line"));
        assert_eq!(line_at(text, text.len()), (3, "third"));

        let text = "Project - Atlas\rOwner - Sam";
        assert_eq!(line_at(text, 18), (2, "Owner - Sam"));
    }

    #[test]
    fn test_split_lines_on_any_break() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\n\nd\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn test_typed_match_generic_has_no_patterns() {
        assert!(typed_match(FieldCategory::Generic, "Date: 2024-01-01").is_none());
        assert_eq!(
            typed_match(FieldCategory::Date, "Date: 2024-01-01").map(|m| m.value),
            Some("2024-01-01".to_string())
        );
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("żółw", 2), "żó");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}

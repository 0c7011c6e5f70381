//! Keyword fallback: any line mentioning the field name.

use super::{split_lines, truncate_chars, ExtractionMatch, FieldExtractor};

/// Finds lines containing the field name, case-insensitively.
///
/// The value is the text after the first `:`; without a colon, the first word
/// containing a digit; failing that, the whole line. Values are truncated to
/// `max_chars` characters and empty values are skipped.
pub struct KeywordMatcher {
    needle: String,
    max_chars: usize,
}

impl KeywordMatcher {
    pub fn new(field: &str, max_chars: usize) -> Self {
        Self {
            needle: field.to_lowercase(),
            max_chars,
        }
    }

    fn value_from_line(&self, line: &str) -> String {
        if let Some((_, after)) = line.split_once(':') {
            return truncate_chars(after.trim(), self.max_chars);
        }

        line.split_whitespace()
            .find(|word| word.chars().any(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .unwrap_or_else(|| truncate_chars(line.trim(), self.max_chars))
    }
}

impl FieldExtractor for KeywordMatcher {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.hits(text).next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.hits(text).collect()
    }
}

impl KeywordMatcher {
    fn hits<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ExtractionMatch<String>> + 'a {
        split_lines(text)
            .enumerate()
            .filter(|(_, line)| !self.needle.is_empty() && line.to_lowercase().contains(&self.needle))
            .filter_map(|(index, line)| {
                let value = self.value_from_line(line);
                if value.is_empty() {
                    return None;
                }
                Some(ExtractionMatch::new(value, line.trim()).with_line_number(index + 1))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_value() {
        let result = KeywordMatcher::new("phone", 100)
            .extract("Contact\nOffice phone: 555-0100")
            .unwrap();
        assert_eq!(result.value, "555-0100");
        assert_eq!(result.line_number, Some(2));
    }

    #[test]
    fn test_first_word_with_digit() {
        let result = KeywordMatcher::new("order", 100)
            .extract("Your order #A1234 ships today")
            .unwrap();
        assert_eq!(result.value, "#A1234");
    }

    #[test]
    fn test_whole_line_truncated() {
        let result = KeywordMatcher::new("status", 10)
            .extract("  Status pending approval  ")
            .unwrap();
        assert_eq!(result.value, "Status pen");
        assert_eq!(result.source, "Status pending approval");
    }

    #[test]
    fn test_empty_value_skipped() {
        let result = KeywordMatcher::new("notes", 100)
            .extract("Notes:\nFinal notes: none")
            .unwrap();
        assert_eq!(result.value, "none");
        assert_eq!(result.line_number, Some(2));
    }

    #[test]
    fn test_carriage_return_lines() {
        let result = KeywordMatcher::new("phone", 100)
            .extract("Contact\rOffice phone: 555-0100\rFax: none")
            .unwrap();
        assert_eq!(result.value, "555-0100");
        assert_eq!(result.line_number, Some(2));
    }

    #[test]
    fn test_no_hit() {
        assert!(KeywordMatcher::new("vat", 100).extract("Total: $5").is_none());
    }
}

//! Currency amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_DOLLAR, AMOUNT_LABELED, AMOUNT_TOTAL};
use super::{match_in_text, ExtractionMatch, FieldExtractor};

/// Currency field extractor.
///
/// A `$`-prefixed amount anywhere in the text is preferred; otherwise a
/// `Total`/`Amount` labeled number. Values are normalized with
/// [`normalize_currency`].
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        [&*AMOUNT_DOLLAR, &*AMOUNT_TOTAL, &*AMOUNT_LABELED]
            .into_iter()
            .find_map(|pattern| pattern.find_iter(text).find_map(|m| amount_match(text, m)))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        [&*AMOUNT_DOLLAR, &*AMOUNT_TOTAL, &*AMOUNT_LABELED]
            .into_iter()
            .flat_map(|pattern| pattern.find_iter(text).filter_map(|m| amount_match(text, m)))
            .collect()
    }
}

/// Normalized match, or `None` when no digits survive normalization.
fn amount_match(text: &str, m: regex::Match<'_>) -> Option<ExtractionMatch<String>> {
    let value = normalize_currency(m.as_str());
    (value.len() > 1).then(|| match_in_text(value, text, m.start(), m.end()))
}

/// Keep only digits, `.`, `,` and `$`, and ensure a leading `$`.
pub fn normalize_currency(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '$'))
        .collect();

    if cleaned.starts_with('$') {
        cleaned
    } else {
        format!("${}", cleaned)
    }
}

/// Parse a normalized amount such as `$1,234.56`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("Total: 1,234"), "$1,234");
        assert_eq!(normalize_currency("$500.00"), "$500.00");
        assert_eq!(normalize_currency("Amount: $ 42.10"), "$42.10");
    }

    #[test]
    fn test_dollar_amount_preferred() {
        let text = "Total: 900.00\nPaid: $850.00";
        let result = CurrencyExtractor::new().extract(text).unwrap();
        assert_eq!(result.value, "$850.00");
        assert_eq!(result.source, "Paid: $850.00");
    }

    #[test]
    fn test_labeled_total() {
        let result = CurrencyExtractor::new().extract("TOTAL 1,234").unwrap();
        assert_eq!(result.value, "$1,234");
    }

    #[test]
    fn test_labeled_amount() {
        let result = CurrencyExtractor::new().extract("Amount: 75.25").unwrap();
        assert_eq!(result.value, "$75.25");
    }

    #[test]
    fn test_no_amount() {
        assert!(CurrencyExtractor::new().extract("Total due upon receipt").is_none());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("$1,234"), Some(Decimal::from(1234)));
        assert_eq!(parse_amount("$"), None);
    }
}

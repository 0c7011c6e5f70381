//! Fuzzy matching of `key: value` / `key - value` lines against a field name.

use super::similarity::similarity_ratio;
use super::{split_lines, ExtractionMatch, FieldExtractor};

/// Split a line on its first `:`, or on its first `-` when it has no `:`.
/// Both halves are trimmed.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .or_else(|| line.split_once('-'))
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Matches line keys against a field name by similarity ratio.
pub struct FuzzyKeyMatcher {
    field: String,
    threshold: f64,
}

impl FuzzyKeyMatcher {
    /// Create a matcher for a field; keys must score strictly above `threshold`.
    pub fn new(field: &str, threshold: f64) -> Self {
        Self {
            field: field.to_lowercase(),
            threshold,
        }
    }

    fn scored_lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ExtractionMatch<String>> + 'a {
        split_lines(text).enumerate().filter_map(move |(index, line)| {
            let (key, value) = split_key_value(line)?;
            let ratio = similarity_ratio(&key.to_lowercase(), &self.field);
            Some(
                ExtractionMatch::new(value.to_string(), line.trim())
                    .with_line_number(index + 1)
                    .with_confidence(ratio),
            )
        })
    }
}

impl FieldExtractor for FuzzyKeyMatcher {
    type Output = ExtractionMatch<String>;

    /// Best-scoring line; ties keep the earlier line.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let mut best: Option<Self::Output> = None;

        for candidate in self.scored_lines(text) {
            let better = match &best {
                Some(current) => candidate.confidence > current.confidence,
                None => candidate.confidence > Some(0.0),
            };
            if better {
                best = Some(candidate);
            }
        }

        best.filter(|m| m.confidence.is_some_and(|ratio| ratio > self.threshold))
    }

    /// Every line scoring above the threshold, in line order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.scored_lines(text)
            .filter(|m| m.confidence.is_some_and(|ratio| ratio > self.threshold))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("Owner - Sam"), Some(("Owner", "Sam")));
        assert_eq!(split_key_value("Invoice No: INV-1001"), Some(("Invoice No", "INV-1001")));
        assert_eq!(split_key_value("Time: 10:30"), Some(("Time", "10:30")));
        assert_eq!(split_key_value("no delimiter"), None);
    }

    #[test]
    fn test_exact_key() {
        let text = "Project - Atlas\nOwner - Sam";
        let result = FuzzyKeyMatcher::new("owner", 0.7).extract(text).unwrap();
        assert_eq!(result.value, "Sam");
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(result.line_number, Some(2));
        assert_eq!(result.source, "Owner - Sam");
    }

    #[test]
    fn test_carriage_return_lines() {
        let result = FuzzyKeyMatcher::new("owner", 0.7)
            .extract("Project - Atlas\rOwner - Sam")
            .unwrap();
        assert_eq!(result.value, "Sam");
        assert_eq!(result.line_number, Some(2));
    }

    #[test]
    fn test_boundary_ratio_rejected() {
        // similarity("abcdefghij", "abcdefgxyz") is exactly 0.7
        let text = "abcdefghij: value";
        assert!(FuzzyKeyMatcher::new("abcdefgxyz", 0.7).extract(text).is_none());
        assert!(FuzzyKeyMatcher::new("abcdefgxyz", 0.69).extract(text).is_some());
    }

    #[test]
    fn test_tie_keeps_first_line() {
        let text = "Owner: Sam\nOWNER: Alex";
        let result = FuzzyKeyMatcher::new("owner", 0.7).extract(text).unwrap();
        assert_eq!(result.value, "Sam");
    }

    #[test]
    fn test_higher_ratio_wins() {
        let text = "Owners: Team\nOwner: Sam";
        let result = FuzzyKeyMatcher::new("owner", 0.7).extract(text).unwrap();
        assert_eq!(result.value, "Sam");
    }

    #[test]
    fn test_empty_value_is_still_a_match() {
        let result = FuzzyKeyMatcher::new("owner", 0.7).extract("Owner:").unwrap();
        assert_eq!(result.value, "");
    }

    #[test]
    fn test_extract_all_above_threshold() {
        let text = "Owner: Sam\nBudget: 10\nOwners: Team";
        let all = FuzzyKeyMatcher::new("owner", 0.7).extract_all(text);
        let values: Vec<_> = all.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["Sam", "Team"]);
    }
}

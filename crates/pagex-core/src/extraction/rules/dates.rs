//! Date extraction.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_MDY, DATE_YMD};
use super::{match_in_text, ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Formats are tried in order `YYYY-MM-DD`, `MM/DD/YYYY`, `DD-MM-YYYY`; the
/// first format with any match in the text wins, even if a later format
/// matches earlier in the text. Values are returned verbatim.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        [&*DATE_YMD, &*DATE_MDY, &*DATE_DMY]
            .into_iter()
            .find_map(|pattern| pattern.find(text))
            .map(|m| match_in_text(m.as_str().to_string(), text, m.start(), m.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in [&*DATE_YMD, &*DATE_MDY, &*DATE_DMY] {
            for m in pattern.find_iter(text) {
                // Skip spans already claimed by an earlier format
                if results
                    .iter()
                    .any(|r: &ExtractionMatch<String>| overlaps(r.position, m.start(), m.end()))
                {
                    continue;
                }
                results.push(match_in_text(m.as_str().to_string(), text, m.start(), m.end()));
            }
        }

        results
    }
}

fn overlaps(position: Option<(usize, usize)>, start: usize, end: usize) -> bool {
    position.is_some_and(|(s, e)| start < e && s < end)
}

/// Parse a date in any of the supported formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let format = if s.contains('/') {
        "%m/%d/%Y"
    } else if s.len() >= 5 && s.as_bytes()[4] == b'-' {
        "%Y-%m-%d"
    } else {
        "%d-%m-%Y"
    };

    NaiveDate::parse_from_str(s, format).ok()
}

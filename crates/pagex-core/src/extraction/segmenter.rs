//! Splitting page text into anchor-delimited records.

use regex::Regex;

/// A span of page text starting at an anchor match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Anchor match text (e.g. "INV-1001").
    pub anchor: &'a str,
    /// Byte offset of the anchor in the page.
    pub start: usize,
    /// Byte offset of the next anchor, or the page length.
    pub end: usize,
    /// `page[start..end]`.
    pub text: &'a str,
}

/// Splits pages at anchor matches.
#[derive(Debug, Clone)]
pub struct Segmenter {
    anchor: Regex,
}

impl Segmenter {
    /// Compile an anchor pattern. The pattern is case-sensitive unless it
    /// opts into `(?i)` itself.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            anchor: Regex::new(pattern)?,
        })
    }

    /// Records in left-to-right order; empty when nothing matches.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Record<'a>> {
        let anchors: Vec<_> = self.anchor.find_iter(text).filter(|m| !m.is_empty()).collect();

        anchors
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let end = anchors.get(i + 1).map(|next| next.start()).unwrap_or(text.len());
                Record {
                    anchor: m.as_str(),
                    start: m.start(),
                    end,
                    text: &text[m.start()..end],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_between_anchors() {
        let text = "Header\nINV-1 Alice\nINV-22 Bob\ntrailer";
        let segmenter = Segmenter::new(r"INV-\d+").unwrap();
        let records = segmenter.segment(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].anchor, "INV-1");
        assert_eq!(records[0].text, "INV-1 Alice\n");
        assert_eq!(records[1].anchor, "INV-22");
        assert_eq!(records[1].text, "INV-22 Bob\ntrailer");
        assert_eq!(records[1].end, text.len());
    }

    #[test]
    fn test_no_anchor() {
        let segmenter = Segmenter::new(r"INV-\d+").unwrap();
        assert!(segmenter.segment("nothing to see").is_empty());
    }

    #[test]
    fn test_anchor_is_case_sensitive() {
        let segmenter = Segmenter::new(r"INV-\d+").unwrap();
        assert!(segmenter.segment("inv-1001").is_empty());

        let segmenter = Segmenter::new(r"(?i)INV-\d+").unwrap();
        assert_eq!(segmenter.segment("inv-1001").len(), 1);
    }

    #[test]
    fn test_empty_matches_ignored() {
        let segmenter = Segmenter::new(r"X*").unwrap();
        assert!(segmenter.segment("abc").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Segmenter::new(r"INV-(\d+").is_err());
    }
}

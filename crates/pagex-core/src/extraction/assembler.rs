//! Building ordered records from per-field matches.

use tracing::debug;

use crate::models::field::FieldSpec;
use crate::models::result::{FieldResult, RecordResult};

use super::matcher::FieldMatcher;
use super::rules::line_at;
use super::segmenter::Record;

/// Assembles one record's fields in requested order.
pub struct RecordAssembler<'m> {
    matcher: &'m FieldMatcher,
}

impl<'m> RecordAssembler<'m> {
    pub fn new(matcher: &'m FieldMatcher) -> Self {
        Self { matcher }
    }

    /// Match every field against the record text.
    ///
    /// The anchor field takes the anchor text from segmentation and is not
    /// re-matched. Returns `None` when no other field was found.
    pub fn assemble(&self, record: &Record<'_>, fields: &[FieldSpec], anchor_field: &str) -> Option<RecordResult> {
        let results: Vec<FieldResult> = fields
            .iter()
            .map(|spec| {
                if spec.name == anchor_field {
                    anchor_result(spec, record)
                } else {
                    self.matcher.match_field(record.text, spec)
                }
            })
            .collect();

        let has_fact = results
            .iter()
            .any(|result| result.field != anchor_field && result.is_found());

        if !has_fact {
            debug!("Dropping record {} with no fields besides the anchor", record.anchor);
            return None;
        }

        Some(RecordResult {
            anchor: Some(record.anchor.to_string()),
            span: (record.start, record.end),
            fields: results,
        })
    }
}

fn anchor_result(spec: &FieldSpec, record: &Record<'_>) -> FieldResult {
    let (line_number, line) = line_at(record.text, 0);
    FieldResult {
        value: Some(record.anchor.to_string()),
        line: Some(line.trim().to_string()),
        line_number: Some(line_number),
        ..FieldResult::absent(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::segmenter::Segmenter;
    use crate::models::config::ExtractionConfig;
    use crate::models::field::{ExtractionMode, MatchStrategy};
    use pretty_assertions::assert_eq;

    fn fields(names: &[&str]) -> Vec<FieldSpec> {
        names.iter().map(|n| FieldSpec::new(*n)).collect()
    }

    #[test]
    fn test_order_follows_request() {
        let text = "INV-9\nTotal: $10.00\nCustomer: Ann Lee\nDate: 2024-05-06";
        let segmenter = Segmenter::new(r"INV-\d+").unwrap();
        let record = segmenter.segment(text)[0];
        let matcher = FieldMatcher::for_mode(ExtractionMode::Record, &ExtractionConfig::default());

        let result = RecordAssembler::new(&matcher)
            .assemble(&record, &fields(&["date", "invoice_number", "customer", "total"]), "invoice_number")
            .unwrap();

        let names: Vec<_> = result.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["date", "invoice_number", "customer", "total"]);

        let anchor = result.field("invoice_number").unwrap();
        assert_eq!(anchor.value.as_deref(), Some("INV-9"));
        assert_eq!(anchor.strategy, None);
        assert_eq!(result.field("total").unwrap().strategy, Some(MatchStrategy::Typed));
    }

    #[test]
    fn test_anchor_only_record_dropped() {
        let text = "INV-1 nothing else here";
        let record = Segmenter::new(r"INV-\d+").unwrap().segment(text)[0];
        let matcher = FieldMatcher::for_mode(ExtractionMode::Record, &ExtractionConfig::default());

        let result = RecordAssembler::new(&matcher).assemble(
            &record,
            &fields(&["invoice_number", "date", "total"]),
            "invoice_number",
        );
        assert!(result.is_none());
    }
}

//! End-to-end tests from page text to serialized results.
//!
//! Pages come from `PlainTextSource` or an in-memory `TextSource`, so no PDF
//! fixtures are needed.

use pagex_core::error::SourceError;
use pagex_core::source::Result as SourceResult;
use pagex_core::{
    discover_field_names, extract, ExtractionConfig, ExtractionMode, ExtractionRequest, FieldSpec, PageAggregator,
    PlainTextSource, TextSource,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;

struct MemorySource {
    pages: Vec<&'static str>,
}

impl TextSource for MemorySource {
    fn load(&mut self, _data: &[u8]) -> SourceResult<()> {
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> SourceResult<String> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(|p| p.to_string())
            .ok_or(SourceError::InvalidPage(page))
    }
}

fn specs(names: &[&str]) -> Vec<FieldSpec> {
    names.iter().map(|n| FieldSpec::new(*n)).collect()
}

// ---------------------------------------------------------------------------
// Record mode: an invoice batch spread across two pages
// ---------------------------------------------------------------------------
#[test]
fn test_invoice_batch_to_json() {
    let text = "\
Invoice No: INV-1001
Customer: Jane Doe
Date: 2024-03-01
Total: $500.00
Invoice No: INV-1002
Customer: John Roe
Date: 03/15/2024
Total: $1,250.00\u{c}Invoice No: INV-1003
Billed To: Acme Corp
Total: 75";

    let pages = PlainTextSource::from_text(text, "\u{c}").pages().unwrap();
    let result = extract(
        &pages,
        &specs(&["invoice_number", "customer", "date", "total"]),
        ExtractionMode::Record,
        Some(r"INV-\d+"),
    )
    .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "pages": [
                {
                    "page": 1,
                    "entities": [
                        {"invoice_number": "INV-1001", "customer": "Jane Doe", "date": "2024-03-01", "total": "$500.00"},
                        {"invoice_number": "INV-1002", "customer": "John Roe", "date": "03/15/2024", "total": "$1,250.00"}
                    ]
                },
                {
                    "page": 2,
                    "entities": [
                        {"invoice_number": "INV-1003", "customer": "Acme Corp", "date": null, "total": "$75"}
                    ],
                    "messages": ["could not extract \"date\" for record INV-1003 (page 2)"]
                }
            ]
        })
    );

    let totals: Vec<_> = result.pages[0].records.iter().filter_map(|r| r.field("total")?.as_amount()).collect();
    assert_eq!(totals, vec![Decimal::new(50000, 2), Decimal::new(125000, 2)]);
    assert_eq!(result.record_count(), 3);
}

#[test]
fn test_field_order_survives_serialization() {
    let result = extract(
        &["INV-7\nTotal: $9.00\nCustomer: Ann"],
        &specs(&["total", "customer", "invoice_number"]),
        ExtractionMode::Record,
        Some(r"INV-\d+"),
    )
    .unwrap();

    let json = serde_json::to_string(&result.pages[0].entities).unwrap();
    assert_eq!(json, r#"[{"total":"$9.00","customer":"Ann","invoice_number":"INV-7"}]"#);
}

// ---------------------------------------------------------------------------
// Flat mode: project sheets with a missing field
// ---------------------------------------------------------------------------
#[test]
fn test_flat_pages_from_text_source() {
    let source = MemorySource {
        pages: vec!["Project - Atlas\nOwner - Sam", "Project: Borealis\nLead: Kim\nbudget approved 12000"],
    };

    let request = ExtractionRequest::new(source.pages().unwrap(), specs(&["project", "owner", "budget"]), ExtractionMode::Flat)
        .with_document("projects.pdf");
    let result = PageAggregator::default().extract(&request).unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "pages": [
                {
                    "page": 1,
                    "entities": {"project": "Atlas", "owner": "Sam", "budget": null},
                    "messages": ["could not extract \"budget\" from projects.pdf (page 1)"]
                },
                {
                    "page": 2,
                    "entities": {"project": "Borealis", "owner": null, "budget": "12000"},
                    "messages": ["could not extract \"owner\" from projects.pdf (page 2)"]
                }
            ]
        })
    );
}

#[test]
fn test_discovered_names_drive_extraction() {
    let pages = ["Reference: R-77\nStatus: open\nAssignee: Lee"];
    let names = discover_field_names(&pages);
    assert_eq!(names, vec!["Assignee", "Reference", "Status"]);

    let fields: Vec<FieldSpec> = names.into_iter().map(FieldSpec::from).collect();
    let result = extract(&pages, &fields, ExtractionMode::Flat, None).unwrap();

    assert!(result.messages().next().is_none());
    let entities = result.pages[0].entities.maps()[0].clone();
    assert_eq!(entities.get("Reference"), Some("R-77"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------
#[test]
fn test_config_file_changes_matching() {
    let config: pagex_core::PagexConfig = serde_json::from_value(json!({
        "extraction": {
            "flat_strategies": ["fuzzy_key"],
            "include_page_text": true
        }
    }))
    .unwrap();
    assert_eq!(config.extraction.similarity_threshold, ExtractionConfig::default().similarity_threshold);

    let aggregator = PageAggregator::new(config.extraction);
    let result = aggregator
        .aggregate(&["the owner is Sam, call 555"], &specs(&["owner"]), ExtractionMode::Flat)
        .unwrap();

    // keyword fallback disabled
    assert_eq!(result.pages[0].entities.maps()[0].get("owner"), None);
    assert_eq!(result.pages[0].text.as_deref(), Some("the owner is Sam, call 555"));
}

#[test]
fn test_unknown_mode_string() {
    let err = "table".parse::<ExtractionMode>().unwrap_err();
    assert_eq!(err.to_string(), "unsupported extraction mode: table");
}

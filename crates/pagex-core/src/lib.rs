//! Core library for pulling named fields out of page text.
//!
//! This crate provides:
//! - Page text sources (plain text with form-feed pages, PDF via lopdf)
//! - Record segmentation on an anchor regex (e.g. invoice numbers)
//! - Typed patterns for dates, currency amounts and customer names
//! - Fuzzy `key: value` matching and a keyword fallback
//! - Per-page results with ordered entities and "not found" diagnostics

pub mod error;
pub mod extraction;
pub mod models;
pub mod source;

pub use error::{ExtractionError, NormalizeError, PagexError, Result, SourceError};
pub use extraction::{
    discover_field_names, extract, similarity_ratio, ExtractionRequest, FieldMatcher, MarkdownCleaner,
    PageAggregator, PageNormalizer, Segmenter,
};
pub use models::config::{ExtractionConfig, PagexConfig, SourceConfig};
pub use models::field::{ExtractionMode, FieldCategory, FieldSpec, MatchStrategy};
pub use models::result::{EntityMap, ExtractionResult, FieldResult, PageEntities, PageResult, RecordResult};
pub use source::{load_pages, PlainTextSource, TextSource};
#[cfg(feature = "pdf")]
pub use source::PdfTextSource;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

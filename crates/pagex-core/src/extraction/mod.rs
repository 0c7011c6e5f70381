//! Field extraction over page text.
//!
//! Pages are optionally normalized, split into anchor-delimited records
//! (record mode) or treated whole (flat mode), and every requested field is
//! run through the [`FieldMatcher`] strategy chain.

pub mod aggregator;
pub mod assembler;
pub mod discovery;
pub mod matcher;
pub mod normalize;
pub mod rules;
pub mod segmenter;

pub use aggregator::{extract, ExtractionRequest, PageAggregator};
pub use assembler::RecordAssembler;
pub use discovery::discover_field_names;
pub use matcher::FieldMatcher;
pub use normalize::{MarkdownCleaner, PageNormalizer};
pub use rules::{similarity_ratio, ExtractionMatch, FieldExtractor};
pub use segmenter::{Record, Segmenter};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

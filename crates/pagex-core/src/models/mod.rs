//! Data models for field extraction.

pub mod config;
pub mod field;
pub mod result;

pub use config::{ExtractionConfig, PagexConfig, SourceConfig};
pub use field::{ExtractionMode, FieldCategory, FieldSpec, MatchStrategy};
pub use result::{EntityMap, ExtractionResult, FieldResult, PageEntities, PageResult, RecordResult};

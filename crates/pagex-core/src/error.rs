//! Error types for the pagex-core library.

use thiserror::Error;

/// Main error type for the pagex library.
#[derive(Error, Debug)]
pub enum PagexError {
    /// Text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Extraction request error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading page text from a document.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document is encrypted and cannot be processed.
    #[error("document is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("document has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(usize),

    /// File format not handled by any source.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that reject an extraction request before any page is scanned.
///
/// A field that cannot be found is not an error; it is reported as a null
/// value in the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No pages or no fields were supplied.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// The same field name was requested twice.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// Mode string is neither "record" nor "flat".
    #[error("unsupported extraction mode: {0}")]
    UnsupportedMode(String),

    /// Record mode was requested without an anchor pattern.
    #[error("record mode requires an anchor pattern")]
    MissingAnchorPattern,

    /// The anchor field is not among the requested fields.
    #[error("anchor field {0:?} is not one of the requested fields")]
    UnknownAnchorField(String),

    /// Record mode with no generic field to hold the anchor text.
    #[error("no generic field can hold the anchor text; name one as the anchor field")]
    NoAnchorField,

    /// Unknown strategy or category name.
    #[error("unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },
}

/// A page normalizer could not rewrite a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{normalizer} normalization failed: {reason}")]
pub struct NormalizeError {
    pub normalizer: String,
    pub reason: String,
}

/// Result type for the pagex library.
pub type Result<T> = std::result::Result<T, PagexError>;

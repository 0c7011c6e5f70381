//! Field specifications and the enums that steer matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Category of a requested field, selecting which typed patterns apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    /// Calendar date (`YYYY-MM-DD`, `MM/DD/YYYY`, `DD-MM-YYYY`).
    Date,
    /// Currency amount, normalized to a `$`-prefixed string.
    Currency,
    /// Person or company name following a billing label.
    Name,
    /// No typed patterns.
    Generic,
}

impl FieldCategory {
    /// Infer a category from a field name.
    pub fn infer(name: &str) -> Self {
        let name = name.to_lowercase().replace(['_', '-'], " ");

        if name.contains("date") {
            Self::Date
        } else if name.contains("total") || name.contains("amount") {
            Self::Currency
        } else if ["customer", "client", "billed to", "bill to"]
            .iter()
            .any(|label| name.contains(label))
        {
            Self::Name
        } else {
            Self::Generic
        }
    }

    /// Get the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Currency => "currency",
            Self::Name => "name",
            Self::Generic => "generic",
        }
    }
}

impl FromStr for FieldCategory {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "currency" | "amount" | "money" => Ok(Self::Currency),
            "name" => Ok(Self::Name),
            "generic" | "text" => Ok(Self::Generic),
            other => Err(ExtractionError::UnknownName {
                kind: "field category",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field the caller wants extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in the output.
    pub name: String,
    /// Category selecting typed patterns.
    pub category: FieldCategory,
}

impl FieldSpec {
    /// Create a field spec, inferring its category from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let category = FieldCategory::infer(&name);
        Self { name, category }
    }

    /// Override the inferred category.
    pub fn with_category(mut self, category: FieldCategory) -> Self {
        self.category = category;
        self
    }

    /// Parse `name` or `name=category`.
    pub fn parse(spec: &str) -> Result<Self, ExtractionError> {
        match spec.split_once('=') {
            Some((name, category)) => {
                Ok(Self::new(name.trim()).with_category(category.parse()?))
            }
            None => Ok(Self::new(spec.trim())),
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FieldSpec {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A matching strategy. Variant order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Category-specific format regexes.
    Typed,
    /// Similarity between line keys and the field name.
    FuzzyKey,
    /// Case-insensitive containment of the field name.
    Keyword,
}

impl MatchStrategy {
    /// Get the strategy as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::FuzzyKey => "fuzzy_key",
            Self::Keyword => "keyword",
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "typed" | "pattern" => Ok(Self::Typed),
            "fuzzy_key" | "fuzzy" => Ok(Self::FuzzyKey),
            "keyword" => Ok(Self::Keyword),
            other => Err(ExtractionError::UnknownName {
                kind: "match strategy",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a page is split before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Anchor-based segmentation into records.
    Record,
    /// Whole page treated as one implicit record.
    Flat,
}

impl FromStr for ExtractionMode {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "flat" => Ok(Self::Flat),
            other => Err(ExtractionError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

//! Extraction result models.
//!
//! The serialized shape is `{"pages": [{"page", "entities", "messages"?, "text"?}]}`
//! where `entities` is a single field map in flat mode and an array of field
//! maps in record mode. Field maps keep the requested field order.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::extraction::rules::{amounts::parse_amount, dates::parse_date};
use crate::models::field::{FieldCategory, FieldSpec, MatchStrategy};

/// The outcome of matching one field against one record or page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Requested field name.
    pub field: String,

    /// Category used for typed matching.
    pub category: FieldCategory,

    /// Extracted value, `None` when no strategy matched.
    pub value: Option<String>,

    /// Strategy that produced the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<MatchStrategy>,

    /// Raw line the value came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    /// 1-based line number within the searched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,

    /// Similarity ratio for fuzzy key matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl FieldResult {
    /// A result with no value.
    pub fn absent(spec: &FieldSpec) -> Self {
        Self {
            field: spec.name.clone(),
            category: spec.category,
            value: None,
            strategy: None,
            line: None,
            line_number: None,
            confidence: None,
        }
    }

    /// Whether a value was found.
    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }

    /// Interpret the value as a calendar date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.value.as_deref().and_then(parse_date)
    }

    /// Interpret the value as a currency amount.
    pub fn as_amount(&self) -> Option<Decimal> {
        self.value.as_deref().and_then(parse_amount)
    }
}

/// Field name to value mapping that preserves insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMap {
    entries: Vec<(String, Option<String>)>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing entry in place.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Value of a field; `None` both for missing keys and null values.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<'a> FromIterator<&'a FieldResult> for EntityMap {
    fn from_iter<I: IntoIterator<Item = &'a FieldResult>>(iter: I) -> Self {
        let mut map = EntityMap::new();
        for result in iter {
            map.insert(result.field.clone(), result.value.clone());
        }
        map
    }
}

impl Serialize for EntityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EntityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntityMapVisitor;

        impl<'de> Visitor<'de> for EntityMapVisitor {
            type Value = EntityMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to string or null values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = EntityMap::new();
                while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
                    map.insert(name, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(EntityMapVisitor)
    }
}

/// One assembled record with full match details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    /// Anchor text that opened the record (record mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Byte span of the record within the matched page text, which is the
    /// normalized text when a normalizer ran (see [`PageResult::text`]).
    pub span: (usize, usize),

    /// Per-field results in requested order.
    pub fields: Vec<FieldResult>,
}

impl RecordResult {
    /// Field values in requested order.
    pub fn entities(&self) -> EntityMap {
        self.fields.iter().collect()
    }

    /// Look up the result for a field.
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Fields that no strategy matched.
    pub fn missing(&self) -> impl Iterator<Item = &FieldResult> {
        self.fields.iter().filter(|f| !f.is_found())
    }
}

/// Entities of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageEntities {
    /// Flat mode: one mapping for the whole page.
    Flat(EntityMap),
    /// Record mode: one mapping per record, in discovery order.
    Records(Vec<EntityMap>),
}

impl PageEntities {
    /// Number of records (a flat page counts as one).
    pub fn record_count(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::Records(records) => records.len(),
        }
    }

    /// All mappings on the page.
    pub fn maps(&self) -> Vec<&EntityMap> {
        match self {
            Self::Flat(map) => vec![map],
            Self::Records(records) => records.iter().collect(),
        }
    }
}

/// Result for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed).
    pub page: usize,

    /// Extracted entities.
    pub entities: PageEntities,

    /// Diagnostics such as fields that could not be found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,

    /// Page text as matched, after normalization, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Match details behind `entities`.
    #[serde(skip)]
    pub records: Vec<RecordResult>,
}

/// Result of an extraction call, one entry per input page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub pages: Vec<PageResult>,
}

impl ExtractionResult {
    /// All diagnostics across pages, in page order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.messages.iter().map(String::as_str))
    }

    /// Total number of emitted records.
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(|p| p.entities.record_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn found(field: &str, value: &str) -> FieldResult {
        let mut result = FieldResult::absent(&FieldSpec::new(field));
        result.value = Some(value.to_string());
        result
    }

    #[test]
    fn test_entity_map_keeps_insertion_order() {
        let mut map = EntityMap::new();
        map.insert("zeta", Some("1".to_string()));
        map.insert("alpha", None);
        map.insert("zeta", Some("2".to_string()));

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(map.get("zeta"), Some("2"));
        assert_eq!(map.get("alpha"), None);
        assert!(map.contains_key("alpha"));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"zeta":"2","alpha":null}"#);
    }

    #[test]
    fn test_page_result_json_shape() {
        let record = RecordResult {
            anchor: None,
            span: (0, 10),
            fields: vec![found("owner", "Sam"), FieldResult::absent(&FieldSpec::new("budget"))],
        };
        let page = PageResult {
            page: 1,
            entities: PageEntities::Flat(record.entities()),
            messages: vec!["could not extract \"budget\" (page 1)".to_string()],
            text: None,
            records: vec![record],
        };

        let json = serde_json::to_value(ExtractionResult { pages: vec![page] }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pages": [{
                    "page": 1,
                    "entities": {"owner": "Sam", "budget": null},
                    "messages": ["could not extract \"budget\" (page 1)"]
                }]
            })
        );
    }

    #[test]
    fn test_record_entities_parse_back() {
        let json = r#"{"pages":[{"page":2,"entities":[{"invoice_number":"INV-7","total":"$5"}]}]}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.pages[0].page, 2);
        match &result.pages[0].entities {
            PageEntities::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].get("total"), Some("$5"));
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(
            found("date", "03/15/2024").as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(found("total", "$1,234.50").as_amount(), Some(Decimal::new(123450, 2)));
        assert_eq!(FieldResult::absent(&FieldSpec::new("date")).as_date(), None);
    }
}

//! The layered field matcher.

use tracing::trace;

use crate::models::config::ExtractionConfig;
use crate::models::field::{ExtractionMode, FieldSpec, MatchStrategy};
use crate::models::result::FieldResult;

use super::rules::{typed_match, ExtractionMatch, FieldExtractor, FuzzyKeyMatcher, KeywordMatcher};

/// Runs a chain of strategies against text until one finds the field.
///
/// Strategies always run in priority order (typed, fuzzy key, keyword), no
/// matter how they were listed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatcher {
    strategies: Vec<MatchStrategy>,
    threshold: f64,
    max_value_chars: usize,
}

impl FieldMatcher {
    pub fn new(strategies: &[MatchStrategy], config: &ExtractionConfig) -> Self {
        let mut strategies = strategies.to_vec();
        strategies.sort();
        strategies.dedup();

        Self {
            strategies,
            threshold: config.similarity_threshold,
            max_value_chars: config.max_value_chars,
        }
    }

    /// Matcher with the configured chain for a mode.
    ///
    /// Flat pages have no record boundaries, so typed patterns are never run
    /// in flat mode even when configured.
    pub fn for_mode(mode: ExtractionMode, config: &ExtractionConfig) -> Self {
        match mode {
            ExtractionMode::Record => Self::new(&config.record_strategies, config),
            ExtractionMode::Flat => {
                let strategies: Vec<_> = config
                    .flat_strategies
                    .iter()
                    .copied()
                    .filter(|s| *s != MatchStrategy::Typed)
                    .collect();
                Self::new(&strategies, config)
            }
        }
    }

    pub fn strategies(&self) -> &[MatchStrategy] {
        &self.strategies
    }

    /// Match one field. An absent value is a normal outcome.
    pub fn match_field(&self, text: &str, field: &FieldSpec) -> FieldResult {
        for strategy in &self.strategies {
            if let Some(found) = self.run(*strategy, text, field) {
                trace!(
                    "{} matched {:?} = {:?} on line {:?}",
                    strategy,
                    field.name,
                    found.value,
                    found.line_number
                );
                return FieldResult {
                    field: field.name.clone(),
                    category: field.category,
                    value: Some(found.value),
                    strategy: Some(*strategy),
                    line: Some(found.source),
                    line_number: found.line_number,
                    confidence: found.confidence,
                };
            }
        }

        FieldResult::absent(field)
    }

    fn run(&self, strategy: MatchStrategy, text: &str, field: &FieldSpec) -> Option<ExtractionMatch<String>> {
        match strategy {
            MatchStrategy::Typed => typed_match(field.category, text),
            MatchStrategy::FuzzyKey => FuzzyKeyMatcher::new(&field.name, self.threshold).extract(text),
            MatchStrategy::Keyword => KeywordMatcher::new(&field.name, self.max_value_chars).extract(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldCategory;

    fn matcher(strategies: &[MatchStrategy]) -> FieldMatcher {
        FieldMatcher::new(strategies, &ExtractionConfig::default())
    }

    #[test]
    fn test_strategies_sorted_and_deduplicated() {
        let m = matcher(&[MatchStrategy::Keyword, MatchStrategy::Typed, MatchStrategy::Keyword]);
        assert_eq!(m.strategies(), &[MatchStrategy::Typed, MatchStrategy::Keyword]);
    }

    #[test]
    fn test_typed_wins_over_fuzzy() {
        // The "Date" key line would give "soon" via fuzzy matching
        let text = "Date: soon\nShipped 2024-02-02";
        let result = matcher(&[MatchStrategy::Typed, MatchStrategy::FuzzyKey])
            .match_field(text, &FieldSpec::new("date"));

        assert_eq!(result.value.as_deref(), Some("2024-02-02"));
        assert_eq!(result.strategy, Some(MatchStrategy::Typed));
        assert_eq!(result.confidence, None);
        assert_eq!(result.line_number, Some(2));
    }

    #[test]
    fn test_falls_through_to_fuzzy() {
        let text = "Date: soon";
        let result = matcher(&[MatchStrategy::Typed, MatchStrategy::FuzzyKey])
            .match_field(text, &FieldSpec::new("date"));

        assert_eq!(result.value.as_deref(), Some("soon"));
        assert_eq!(result.strategy, Some(MatchStrategy::FuzzyKey));
        assert_eq!(result.confidence, Some(1.0));
    }

    #[test]
    fn test_generic_field_skips_typed() {
        let result = matcher(&[MatchStrategy::Typed]).match_field("Owner: Sam", &FieldSpec::new("owner"));
        assert!(!result.is_found());
    }

    #[test]
    fn test_keyword_fallback() {
        let text = "Contact the project owner Sam at ext 4411";
        let result = matcher(&[MatchStrategy::FuzzyKey, MatchStrategy::Keyword])
            .match_field(text, &FieldSpec::new("owner"));

        assert_eq!(result.value.as_deref(), Some("4411"));
        assert_eq!(result.strategy, Some(MatchStrategy::Keyword));
    }

    #[test]
    fn test_explicit_category() {
        let spec = FieldSpec::new("issued").with_category(FieldCategory::Date);
        let result = matcher(&[MatchStrategy::Typed]).match_field("on 12/31/2023", &spec);
        assert_eq!(result.value.as_deref(), Some("12/31/2023"));
    }

    #[test]
    fn test_absent() {
        let result = matcher(&[MatchStrategy::Typed, MatchStrategy::FuzzyKey, MatchStrategy::Keyword])
            .match_field("nothing relevant", &FieldSpec::new("total"));
        assert_eq!(result.value, None);
        assert_eq!(result.strategy, None);
        assert_eq!(result.field, "total");
    }

    #[test]
    fn test_flat_mode_never_runs_typed() {
        let config = ExtractionConfig {
            flat_strategies: vec![MatchStrategy::Typed, MatchStrategy::FuzzyKey],
            ..ExtractionConfig::default()
        };
        let m = FieldMatcher::for_mode(ExtractionMode::Flat, &config);
        assert_eq!(m.strategies(), &[MatchStrategy::FuzzyKey]);

        let result = m.match_field("Date: soon\nShipped 2024-02-02", &FieldSpec::new("date"));
        assert_eq!(result.value.as_deref(), Some("soon"));
        assert_eq!(result.strategy, Some(MatchStrategy::FuzzyKey));
    }

    #[test]
    fn test_threshold_from_config() {
        let config = ExtractionConfig {
            similarity_threshold: 0.95,
            ..ExtractionConfig::default()
        };
        let m = FieldMatcher::new(&[MatchStrategy::FuzzyKey], &config);
        assert!(!m.match_field("Owners: Team", &FieldSpec::new("owner")).is_found());
        assert!(m.match_field("Owner: Sam", &FieldSpec::new("owner")).is_found());
    }
}

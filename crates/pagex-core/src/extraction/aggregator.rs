//! Page-level orchestration of segmentation, matching and assembly.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, SourceConfig};
use crate::models::field::{ExtractionMode, FieldCategory, FieldSpec};
use crate::models::result::{ExtractionResult, PageEntities, PageResult, RecordResult};
use crate::source::load_pages;

use super::assembler::RecordAssembler;
use super::matcher::FieldMatcher;
use super::normalize::{MarkdownCleaner, PageNormalizer};
use super::segmenter::Segmenter;
use super::Result;

/// A complete extraction call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// Page texts in document order.
    pub pages: Vec<String>,
    /// Requested fields in output order.
    pub fields: Vec<FieldSpec>,
    /// Record or flat mode.
    pub mode: ExtractionMode,
    /// Anchor regex; falls back to the configured pattern.
    pub anchor_pattern: Option<String>,
    /// Field filled by the anchor match; defaults to the first generic field.
    pub anchor_field: Option<String>,
    /// Document name used in diagnostics.
    pub document: Option<String>,
}

impl ExtractionRequest {
    pub fn new(pages: Vec<String>, fields: Vec<FieldSpec>, mode: ExtractionMode) -> Self {
        Self {
            pages,
            fields,
            mode,
            anchor_pattern: None,
            anchor_field: None,
            document: None,
        }
    }

    pub fn with_anchor_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.anchor_pattern = Some(pattern.into());
        self
    }

    pub fn with_anchor_field(mut self, field: impl Into<String>) -> Self {
        self.anchor_field = Some(field.into());
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }
}

/// Anchor settings resolved for a record-mode call.
struct AnchorPlan<'a> {
    segmenter: Option<Segmenter>,
    pattern: String,
    field: &'a str,
    error: Option<String>,
}

/// Runs extraction over every page of a request.
///
/// Holds only configuration, so one aggregator can serve concurrent calls.
pub struct PageAggregator {
    config: ExtractionConfig,
    record_matcher: FieldMatcher,
    flat_matcher: FieldMatcher,
    normalizer: Option<Box<dyn PageNormalizer>>,
}

impl PageAggregator {
    /// Create an aggregator. `strip_markdown` installs a [`MarkdownCleaner`].
    pub fn new(config: ExtractionConfig) -> Self {
        let normalizer: Option<Box<dyn PageNormalizer>> = if config.strip_markdown {
            Some(Box::new(MarkdownCleaner))
        } else {
            None
        };

        Self {
            record_matcher: FieldMatcher::for_mode(ExtractionMode::Record, &config),
            flat_matcher: FieldMatcher::for_mode(ExtractionMode::Flat, &config),
            config,
            normalizer,
        }
    }

    /// Replace the page normalizer.
    pub fn with_normalizer(mut self, normalizer: impl PageNormalizer + 'static) -> Self {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Match raw page text without any normalizer.
    pub fn without_normalizer(mut self) -> Self {
        self.normalizer = None;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run a full request.
    pub fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult> {
        self.run(
            &request.pages,
            &request.fields,
            request.mode,
            request.anchor_pattern.as_deref(),
            request.anchor_field.as_deref(),
            request.document.as_deref(),
        )
    }

    /// Load a document and run `request` over its pages.
    ///
    /// Pages already in the request are replaced. Diagnostics name the file
    /// unless the request sets its own document name.
    pub fn extract_file(
        &self,
        path: &Path,
        source: &SourceConfig,
        mut request: ExtractionRequest,
    ) -> crate::Result<ExtractionResult> {
        request.pages = load_pages(path, source)?;
        if request.document.is_none() {
            request.document = path.file_name().and_then(|s| s.to_str()).map(str::to_string);
        }
        debug!("Document {} has {} pages", path.display(), request.pages.len());

        Ok(self.extract(&request)?)
    }

    /// Extract `fields` from `pages` using the configured anchor pattern.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        pages: &[S],
        fields: &[FieldSpec],
        mode: ExtractionMode,
    ) -> Result<ExtractionResult> {
        self.run(pages, fields, mode, None, None, None)
    }

    fn run<S: AsRef<str>>(
        &self,
        pages: &[S],
        fields: &[FieldSpec],
        mode: ExtractionMode,
        anchor_pattern: Option<&str>,
        anchor_field: Option<&str>,
        document: Option<&str>,
    ) -> Result<ExtractionResult> {
        validate(pages.len(), fields)?;

        info!(
            "Extracting {} fields from {} pages in {} mode",
            fields.len(),
            pages.len(),
            mode
        );

        let anchor = match mode {
            ExtractionMode::Record => Some(self.plan_anchor(fields, anchor_pattern, anchor_field)?),
            ExtractionMode::Flat => None,
        };

        let pages = pages
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let page = index + 1;
                let text = text.as_ref();
                let normalized = self.normalize(text, page);

                let mut result = match &anchor {
                    Some(plan) => self.record_page(&normalized, page, fields, plan, document),
                    None => self.flat_page(&normalized, page, fields, document),
                };
                if self.config.include_page_text {
                    result.text = Some(normalized.into_owned());
                }
                result
            })
            .collect();

        Ok(ExtractionResult { pages })
    }

    fn plan_anchor<'a>(
        &self,
        fields: &'a [FieldSpec],
        anchor_pattern: Option<&str>,
        anchor_field: Option<&str>,
    ) -> Result<AnchorPlan<'a>> {
        let pattern = anchor_pattern
            .map(str::to_string)
            .or_else(|| self.config.anchor_pattern.clone())
            .ok_or(ExtractionError::MissingAnchorPattern)?;

        let field = match anchor_field {
            Some(name) => fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.name.as_str())
                .ok_or_else(|| ExtractionError::UnknownAnchorField(name.to_string()))?,
            // Typed fields keep their own patterns
            None => fields
                .iter()
                .find(|f| f.category == FieldCategory::Generic)
                .map(|f| f.name.as_str())
                .ok_or(ExtractionError::NoAnchorField)?,
        };

        let (segmenter, error) = match Segmenter::new(&pattern) {
            Ok(segmenter) => (Some(segmenter), None),
            Err(e) => {
                warn!("Anchor pattern {:?} does not compile: {}", pattern, e);
                (None, Some(e.to_string()))
            }
        };

        Ok(AnchorPlan {
            segmenter,
            pattern,
            field,
            error,
        })
    }

    fn normalize<'t>(&self, text: &'t str, page: usize) -> Cow<'t, str> {
        let Some(normalizer) = &self.normalizer else {
            return Cow::Borrowed(text);
        };

        match normalizer.normalize(text) {
            Ok(normalized) => Cow::Owned(normalized),
            Err(e) => {
                warn!(
                    "Normalizer {} failed on page {}, using raw text: {}",
                    normalizer.name(),
                    page,
                    e
                );
                Cow::Borrowed(text)
            }
        }
    }

    fn record_page(
        &self,
        text: &str,
        page: usize,
        fields: &[FieldSpec],
        plan: &AnchorPlan<'_>,
        document: Option<&str>,
    ) -> PageResult {
        let mut messages = Vec::new();

        let records: Vec<RecordResult> = match &plan.segmenter {
            Some(segmenter) => {
                let assembler = RecordAssembler::new(&self.record_matcher);
                let segments = segmenter.segment(text);
                let records: Vec<_> = segments
                    .iter()
                    .filter_map(|record| assembler.assemble(record, fields, plan.field))
                    .collect();

                debug!(
                    "Page {}: {} anchors, {} records kept",
                    page,
                    segments.len(),
                    records.len()
                );

                if segments.is_empty() {
                    messages.push(format!(
                        "no records matching {:?} found {}",
                        plan.pattern,
                        location(document, page)
                    ));
                }
                records
            }
            None => {
                messages.push(format!(
                    "anchor pattern {:?} is invalid: {}",
                    plan.pattern,
                    plan.error.as_deref().unwrap_or("unknown error")
                ));
                Vec::new()
            }
        };

        for record in &records {
            let anchor = record.anchor.as_deref().unwrap_or_default();
            for missing in record.missing() {
                messages.push(format!(
                    "could not extract {:?} for record {} {}",
                    missing.field,
                    anchor,
                    location(document, page)
                ));
            }
        }

        PageResult {
            page,
            entities: PageEntities::Records(records.iter().map(RecordResult::entities).collect()),
            messages: self.messages(messages),
            text: None,
            records,
        }
    }

    fn flat_page(&self, text: &str, page: usize, fields: &[FieldSpec], document: Option<&str>) -> PageResult {
        let record = RecordResult {
            anchor: None,
            span: (0, text.len()),
            fields: fields
                .iter()
                .map(|spec| self.flat_matcher.match_field(text, spec))
                .collect(),
        };

        let messages = record
            .missing()
            .map(|missing| format!("could not extract {:?} {}", missing.field, location(document, page)))
            .collect();

        debug!(
            "Page {}: {}/{} fields found",
            page,
            record.fields.len() - record.missing().count(),
            record.fields.len()
        );

        PageResult {
            page,
            entities: PageEntities::Flat(record.entities()),
            messages: self.messages(messages),
            text: None,
            records: vec![record],
        }
    }

    fn messages(&self, messages: Vec<String>) -> Vec<String> {
        if self.config.include_messages {
            messages
        } else {
            Vec::new()
        }
    }
}

impl Default for PageAggregator {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

fn location(document: Option<&str>, page: usize) -> String {
    match document {
        Some(document) => format!("from {} (page {})", document, page),
        None => format!("(page {})", page),
    }
}

fn validate(page_count: usize, fields: &[FieldSpec]) -> Result<()> {
    if page_count == 0 {
        return Err(ExtractionError::EmptyInput("no pages"));
    }
    if fields.is_empty() {
        return Err(ExtractionError::EmptyInput("no fields"));
    }

    let mut seen = HashSet::new();
    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(ExtractionError::EmptyInput("blank field name"));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ExtractionError::DuplicateField(field.name.clone()));
        }
    }

    Ok(())
}

/// Extract with the default configuration.
pub fn extract<S: AsRef<str>>(
    pages: &[S],
    fields: &[FieldSpec],
    mode: ExtractionMode,
    anchor_pattern: Option<&str>,
) -> Result<ExtractionResult> {
    PageAggregator::default().run(pages, fields, mode, anchor_pattern, None, None)
}

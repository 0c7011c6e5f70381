//! WASM bindings for page field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Page text is supplied by the caller; PDF reading is not compiled in.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use pagex_core::extraction::rules::{parse_amount as parse_currency, parse_date as parse_calendar_date};
use pagex_core::{ExtractionConfig, ExtractionMode, ExtractionRequest, ExtractionResult, FieldSpec, PageAggregator};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    pagex_core::VERSION.to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects instead of ES Maps, keeping field order
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run_extraction(
    config: &ExtractionConfig,
    pages: Vec<String>,
    fields: &[String],
    mode: &str,
    anchor_pattern: Option<String>,
) -> Result<ExtractionResult, String> {
    let mode: ExtractionMode = mode.parse().map_err(|e: pagex_core::ExtractionError| e.to_string())?;
    let fields = fields
        .iter()
        .map(|f| FieldSpec::parse(f))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut request = ExtractionRequest::new(pages, fields, mode);
    request.anchor_pattern = anchor_pattern;

    PageAggregator::new(config.clone())
        .extract(&request)
        .map_err(|e| e.to_string())
}

/// Extract fields from page texts with the default configuration.
///
/// `fields` entries are `name` or `name=category`; `mode` is "record" or
/// "flat". Returns `{pages: [{page, entities, messages?}]}`.
#[wasm_bindgen]
pub fn extract(
    pages: Vec<String>,
    fields: Vec<String>,
    mode: &str,
    anchor_pattern: Option<String>,
) -> Result<JsValue, JsValue> {
    let result = run_extraction(&ExtractionConfig::default(), pages, &fields, mode, anchor_pattern)
        .map_err(|e| JsValue::from_str(&e))?;
    to_js(&result)
}

/// Same as [`extract`], returning the result as a JSON string.
#[wasm_bindgen]
pub fn extract_json(
    pages: Vec<String>,
    fields: Vec<String>,
    mode: &str,
    anchor_pattern: Option<String>,
) -> Result<String, JsValue> {
    let result = run_extraction(&ExtractionConfig::default(), pages, &fields, mode, anchor_pattern)
        .map_err(|e| JsValue::from_str(&e))?;
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sorted `key: value` labels found across the pages.
#[wasm_bindgen]
pub fn discover_field_names(pages: Vec<String>) -> Vec<String> {
    pagex_core::discover_field_names(&pages)
}

/// Similarity ratio between two strings (0.0 - 1.0).
#[wasm_bindgen]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    pagex_core::similarity_ratio(a, b)
}

/// Parse a currency value (e.g., "$1,234.50").
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    parse_currency(amount).map(|d| d.to_string().parse().unwrap_or(0.0))
}

/// Parse a date in any supported format into `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn parse_date(date_str: &str) -> Option<String> {
    parse_calendar_date(date_str).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Configurable extractor class for browser use.
#[wasm_bindgen]
pub struct FieldExtractor {
    config: ExtractionConfig,
    log_messages: bool,
}

#[wasm_bindgen]
impl FieldExtractor {
    /// Create an extractor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            log_messages: false,
        }
    }

    /// Set the fuzzy key similarity threshold.
    #[wasm_bindgen]
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), JsValue> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(JsValue::from_str("threshold must be between 0 and 1"));
        }
        self.config.similarity_threshold = threshold;
        Ok(())
    }

    /// Anchor pattern used when `extract` gets none.
    #[wasm_bindgen]
    pub fn set_anchor_pattern(&mut self, pattern: Option<String>) {
        self.config.anchor_pattern = pattern;
    }

    /// Enable or disable markdown stripping before matching.
    #[wasm_bindgen]
    pub fn set_strip_markdown(&mut self, strip: bool) {
        self.config.strip_markdown = strip;
    }

    /// Also write "could not extract" diagnostics to the browser console.
    #[wasm_bindgen]
    pub fn set_log_messages(&mut self, log: bool) {
        self.log_messages = log;
    }

    /// Extract fields from page texts.
    #[wasm_bindgen]
    pub fn extract(
        &self,
        pages: Vec<String>,
        fields: Vec<String>,
        mode: &str,
        anchor_pattern: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let result = self.run(pages, &fields, mode, anchor_pattern)?;
        to_js(&result)
    }

    /// Extract with per-field strategy, line and similarity details.
    #[wasm_bindgen]
    pub fn extract_with_details(
        &self,
        pages: Vec<String>,
        fields: Vec<String>,
        mode: &str,
        anchor_pattern: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let result = self.run(pages, &fields, mode, anchor_pattern)?;

        #[derive(Serialize)]
        struct PageDetails<'a> {
            page: usize,
            records: &'a [pagex_core::RecordResult],
            messages: &'a [String],
        }

        let details: Vec<PageDetails<'_>> = result
            .pages
            .iter()
            .map(|p| PageDetails {
                page: p.page,
                records: &p.records,
                messages: &p.messages,
            })
            .collect();

        to_js(&details)
    }
}

impl FieldExtractor {
    fn run(
        &self,
        pages: Vec<String>,
        fields: &[String],
        mode: &str,
        anchor_pattern: Option<String>,
    ) -> Result<ExtractionResult, JsValue> {
        let result = run_extraction(&self.config, pages, fields, mode, anchor_pattern)
            .map_err(|e| JsValue::from_str(&e))?;

        if self.log_messages {
            for message in result.messages() {
                web_sys::console::warn_1(&JsValue::from_str(message));
            }
        }

        Ok(result)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod fields;
pub mod pages;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use pagex_core::{ExtractionMode, ExtractionRequest, ExtractionResult, FieldSpec, PagexConfig, RecordResult};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagex")
        .join("config.json")
}

/// Load the configuration for a command.
///
/// An explicit path must exist; otherwise the default file is used when
/// present, and built-in defaults when not.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PagexConfig> {
    if let Some(path) = config_path {
        return PagexConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        PagexConfig::from_file(&default_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", default_path.display(), e))
    } else {
        Ok(PagexConfig::default())
    }
}

/// Field selection shared by `extract` and `batch`.
#[derive(Args, Clone)]
pub struct FieldArgs {
    /// Field to extract, as `name` or `name=category` (repeatable or comma-separated)
    #[arg(short = 'F', long = "field", required = true, value_delimiter = ',', value_parser = FieldSpec::parse)]
    pub fields: Vec<FieldSpec>,

    /// Extraction mode: `record` (anchor-delimited records) or `flat` (whole page)
    #[arg(short, long, default_value = "record")]
    pub mode: ExtractionMode,

    /// Anchor regex that starts each record (default from config)
    #[arg(short, long)]
    pub anchor: Option<String>,

    /// Field filled with the anchor text (default: first generic field)
    #[arg(long)]
    pub anchor_field: Option<String>,
}

impl FieldArgs {
    /// Build a request for the pages of one document.
    pub fn request(&self, pages: Vec<String>, document: &Path) -> ExtractionRequest {
        let mut request = ExtractionRequest::new(pages, self.fields.clone(), self.mode).with_document(document_name(document));
        request.anchor_pattern = self.anchor.clone();
        request.anchor_field = self.anchor_field.clone();
        request
    }
}

/// File name used in diagnostics.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per record
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(
    result: &ExtractionResult,
    fields: &[FieldSpec],
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result, fields),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult, fields: &[FieldSpec]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["page".to_string(), "record".to_string()];
    header.extend(fields.iter().map(|f| f.name.clone()));
    wtr.write_record(&header)?;

    for page in &result.pages {
        for (index, entities) in page.entities.maps().into_iter().enumerate() {
            let mut row = vec![page.page.to_string(), (index + 1).to_string()];
            row.extend(
                fields
                    .iter()
                    .map(|f| entities.get(&f.name).unwrap_or_default().to_string()),
            );
            wtr.write_record(&row)?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    for page in &result.pages {
        output.push_str(&format!("Page {}\n", page.page));

        if page.records.is_empty() {
            output.push_str("  (no records)\n");
        }
        for (index, record) in page.records.iter().enumerate() {
            if let Some(anchor) = &record.anchor {
                output.push_str(&format!("  Record {} ({})\n", index + 1, anchor));
            }
            for field in &record.fields {
                output.push_str(&format!(
                    "    {}: {}\n",
                    field.field,
                    field.value.as_deref().unwrap_or("-")
                ));
            }
        }
        for message in &page.messages {
            output.push_str(&format!("  ! {}\n", message));
        }
        output.push('\n');
    }

    output
}

/// Per-field match details: strategy, line and confidence.
pub fn format_explain(result: &ExtractionResult) -> String {
    let mut output = String::new();

    for page in &result.pages {
        for record in &page.records {
            output.push_str(&explain_record(page.page, record));
        }
    }

    output
}

fn explain_record(page: usize, record: &RecordResult) -> String {
    let mut output = match &record.anchor {
        Some(anchor) => format!("page {} record {} [{}..{}]\n", page, anchor, record.span.0, record.span.1),
        None => format!("page {}\n", page),
    };

    for field in &record.fields {
        let Some(value) = &field.value else {
            output.push_str(&format!("  {} ({}): not found\n", field.field, field.category));
            continue;
        };

        let strategy = field.strategy.map(|s| s.to_string()).unwrap_or_else(|| "anchor".to_string());
        output.push_str(&format!("  {} ({}) = {:?} via {}", field.field, field.category, value, strategy));
        if let Some(line_number) = field.line_number {
            output.push_str(&format!(", line {}", line_number));
        }
        if let Some(confidence) = field.confidence {
            output.push_str(&format!(", similarity {:.2}", confidence));
        }
        if let Some(line) = &field.line {
            output.push_str(&format!(": {:?}", line));
        }
        output.push('\n');
    }

    output
}

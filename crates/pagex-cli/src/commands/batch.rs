//! Batch command - extract fields from many documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use pagex_core::{ExtractionResult, PageAggregator, SourceConfig};

use super::{format_result, load_config, FieldArgs, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    fields: FieldArgs,

    /// Output directory (default: print each result to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text" | "md")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let aggregator = Arc::new(PageAggregator::new(config.extraction.clone()));
    let source_config = Arc::new(config.source.clone());
    let field_args = Arc::new(args.fields.clone());

    // Files run on blocking threads; `buffered` keeps input order.
    let mut outcomes = stream::iter(files)
        .map(|path| {
            let aggregator = Arc::clone(&aggregator);
            let source_config = Arc::clone(&source_config);
            let field_args = Arc::clone(&field_args);
            async move {
                let file_start = Instant::now();
                let task_path = path.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_single_file(&task_path, &aggregator, &source_config, &field_args)
                })
                .await
                .map_err(|e| anyhow::anyhow!("Worker failed: {}", e))
                .and_then(|r| r);
                (path, outcome, file_start.elapsed().as_millis() as u64)
            }
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();

    while let Some((path, outcome, processing_time_ms)) = outcomes.next().await {
        match outcome {
            Ok(result) => {
                results.push(FileResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for file in &successful {
        let Some(result) = &file.result else {
            continue;
        };
        let content = format_result(result, &args.fields.fields, args.format, false)?;

        match &args.output_dir {
            Some(output_dir) => {
                let output_path = output_path(output_dir, &file.path, args.format);

                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => {
                println!("==> {} <==", file.path.display());
                println!("{}", content.trim_end());
            }
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for file in &failed {
            eprintln!(
                "  - {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    aggregator: &PageAggregator,
    source_config: &SourceConfig,
    field_args: &FieldArgs,
) -> anyhow::Result<ExtractionResult> {
    let request = field_args.request(Vec::new(), path);
    Ok(aggregator.extract_file(path, source_config, request)?)
}

/// Output file for one input; the input's extension is kept so `a.pdf` and
/// `a.txt` do not collide.
fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    output_dir.join(format!("{}.{}", name, format.extension()))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages",
        "records",
        "fields_found",
        "fields_missing",
        "processing_time_ms",
        "error",
    ])?;

    for file in results {
        let filename = file.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(result) = &file.result {
            let (found, missing) = field_counts(result);
            wtr.write_record([
                filename,
                "success",
                &result.pages.len().to_string(),
                &result.record_count().to_string(),
                &found.to_string(),
                &missing.to_string(),
                &file.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &file.processing_time_ms.to_string(),
                file.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Found and missing field values across all emitted records.
fn field_counts(result: &ExtractionResult) -> (usize, usize) {
    result
        .pages
        .iter()
        .flat_map(|page| page.entities.maps())
        .flat_map(|map| map.iter())
        .fold((0, 0), |(found, missing), (_, value)| match value {
            Some(_) => (found + 1, missing),
            None => (found, missing + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_input_extension() {
        let dir = Path::new("out");
        assert_eq!(
            output_path(dir, Path::new("docs/a.pdf"), OutputFormat::Json),
            PathBuf::from("out/a.pdf.json")
        );
        assert_eq!(
            output_path(dir, Path::new("docs/a.txt"), OutputFormat::Csv),
            PathBuf::from("out/a.txt.csv")
        );
    }
}

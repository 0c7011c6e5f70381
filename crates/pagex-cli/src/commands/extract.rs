//! Extract command - pull fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pagex_core::{PageAggregator, PagexConfig};

use super::{format_explain, format_result, load_config, FieldArgs, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF, text or markdown)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    fields: FieldArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show strategy, line and similarity for every field (on stderr)
    #[arg(long)]
    explain: bool,

    /// Include each page's text in the output
    #[arg(long)]
    include_text: bool,

    /// Match against raw text without stripping markdown
    #[arg(long)]
    keep_markdown: bool,

    /// Override the fuzzy key similarity threshold
    #[arg(long)]
    threshold: Option<f64>,
}

impl ExtractArgs {
    fn apply_overrides(&self, config: &mut PagexConfig) -> anyhow::Result<()> {
        if let Some(threshold) = self.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                anyhow::bail!("Threshold must be between 0 and 1, got {}", threshold);
            }
            config.extraction.similarity_threshold = threshold;
        }
        if self.include_text {
            config.extraction.include_page_text = true;
        }
        if self.keep_markdown {
            config.extraction.strip_markdown = false;
        }
        Ok(())
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply_overrides(&mut config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting from file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);

    pb.set_message("Extracting fields...");
    let request = args.fields.request(Vec::new(), &args.input);
    let result = PageAggregator::new(config.extraction).extract_file(&args.input, &config.source, request)?;

    pb.finish_and_clear();

    let output = format_result(&result, &args.fields.fields, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if args.explain {
        eprintln!();
        eprint!("{}", format_explain(&result));
    }

    debug!(
        "Extracted {} records from {} pages in {:?}",
        result.record_count(),
        result.pages.len(),
        start.elapsed()
    );

    Ok(())
}

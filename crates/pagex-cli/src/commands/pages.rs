//! Pages command - count the pages of a document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::debug;

use pagex_core::source::source_for_path;
use pagex_core::TextSource;

use super::{document_name, load_config};

/// Arguments for the pages command.
#[derive(Args)]
pub struct PagesArgs {
    /// Input file (PDF, text or markdown)
    #[arg(required = true)]
    input: PathBuf,

    /// Print a JSON object with per-page text lengths
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PageCount {
    document: String,
    pages: usize,
    characters: Vec<usize>,
}

pub async fn run(args: PagesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut source = source_for_path(&args.input, &config.source)?;
    source.load(&fs::read(&args.input)?)?;
    let count = source.page_count();
    debug!("{} has {} pages", args.input.display(), count);

    if args.json {
        let characters = source
            .pages()?
            .iter()
            .map(|text| text.trim().chars().count())
            .collect();
        let report = PageCount {
            document: document_name(&args.input),
            pages: count,
            characters,
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", count);
    }

    Ok(())
}

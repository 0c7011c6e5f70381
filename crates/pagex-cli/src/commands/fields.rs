//! Fields command - list the `key: value` labels present in a document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use pagex_core::{discover_field_names, load_pages};

use super::load_config;

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Input file (PDF, text or markdown)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the names as a JSON array
    #[arg(long)]
    json: bool,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pages = load_pages(&args.input, &config.source)?;
    let names = discover_field_names(&pages);

    if args.json {
        println!("{}", serde_json::to_string(&names)?);
    } else if names.is_empty() {
        eprintln!("{} No labelled fields found", style("ℹ").blue());
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(())
}

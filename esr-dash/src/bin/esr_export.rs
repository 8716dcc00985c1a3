//! esr-export - write the means table of a survey file to CSV
//!
//! Usage:
//!   esr-export Etudes_relations_amoureuses.xlsx
//!   esr-export data.csv --filters '{"genre": [1], "duration": {"min": 0, "max": 24}}'
//!   esr-export data.xlsx --output - > means.csv

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use esr_common::filter::{self, FilterSelection};
use esr_common::{labeler, loader, stats};

#[derive(Parser, Debug)]
#[command(name = "esr-export")]
#[command(about = "Export the means table of a survey file to CSV")]
#[command(version)]
struct Args {
    /// Survey file (xlsx, xls, ods or delimited text)
    input: PathBuf,

    /// Filter selection as JSON
    #[arg(short, long, value_name = "JSON")]
    filters: Option<String>,

    /// Output file, `-` for stdout (default: moyennes_analyse_<n>participants.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so `--output -` stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let selection: FilterSelection = match &args.filters {
        Some(json) => serde_json::from_str(json).context("Invalid --filters JSON")?,
        None => FilterSelection::default(),
    };
    let spec = selection.to_spec().context("Invalid filter selection")?;

    let raw = loader::load_path(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let table = labeler::apply_labels(&raw)?;
    let selected = filter::apply(&table, &spec)?;
    info!("{} of {} participants selected", selected.len(), table.len());

    let csv = stats::means_csv(&stats::means_table(&selected))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(stats::export_file_name(selected.len())));
    if output.as_os_str() == "-" {
        std::io::stdout()
            .write_all(&csv)
            .context("Failed to write to stdout")?;
    } else {
        std::fs::write(&output, &csv)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote {}", output.display());
    }

    Ok(())
}

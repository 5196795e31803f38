//! Patent research report generator
//!
//! Fetches patent records (from the PatentsView search API or a local
//! CSV/JSON file), normalizes them, computes aggregate statistics, and
//! writes the resulting bundle as JSON for downstream report generation.
//!
//! Examples:
//!   patent_report --keyword "gene editing" --max-results 200
//!   patent_report --keyword battery --start-date 2020-01-01 --end-date 2024-12-31
//!   patent_report --file patents.csv --output bundle.json

use clap::Parser;
use std::fs;
use std::path::PathBuf;

use patentscope_config::{CliConfigMerge, Settings};
use patentscope_pipeline::{ReportEngine, ReportInputs};

/// Command-line arguments for the report generator
#[derive(Parser)]
#[command(
    name = "patent-report",
    about = "Patent analysis with filing trends, inventor networks, and assignee insights",
    version
)]
struct Args {
    /// Path to a CSV or JSON file containing patent data
    #[arg(short, long)]
    file: Option<String>,

    /// Search keywords matched against patent titles (e.g. "gene editing")
    #[arg(short, long)]
    keyword: Option<String>,

    /// Patent date range start (YYYY-MM-DD, defaults to 5 years ago)
    #[arg(long)]
    start_date: Option<String>,

    /// Patent date range end (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    end_date: Option<String>,

    /// Maximum number of patents to fetch
    #[arg(short, long)]
    max_results: Option<usize>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the bundle JSON to this path instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl CliConfigMerge for Args {
    fn merge_into_config(&self, config: &mut Settings) {
        if self.debug {
            config.app.debug_mode = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().expect("valid default filter")),
        )
        .init();

    // Load configuration with CLI argument overrides
    let settings = match &args.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load().unwrap_or_else(|_| Settings::default()),
    }
    .merge_cli_args(&args);

    let inputs = ReportInputs {
        file_path: args.file.clone(),
        keyword: args.keyword.clone(),
        start_date: args.start_date.clone(),
        end_date: args.end_date.clone(),
        max_results: args.max_results,
    };

    let engine = ReportEngine::new(settings);
    let bundle = engine.run(&inputs).await?;

    let summary = format!(
        "{} records from {} | {} unique assignees | peak year {} ({} filings)",
        bundle.metadata.total_records,
        bundle.metadata.source,
        bundle.stats.assignee_stats.total_unique_assignees,
        bundle.stats.filing_trends.peak_year,
        bundle.stats.filing_trends.peak_count,
    );

    let json = serde_json::to_string_pretty(&bundle)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!("✅ Bundle written: {}", path.display());
        }
        None => println!("{json}"),
    }

    eprintln!("📊 {summary}");

    Ok(())
}

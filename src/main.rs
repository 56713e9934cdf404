use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_deal_analyzer::config::{Config, OutputFormat};
use rust_deal_analyzer::criteria::load_criteria;
use rust_deal_analyzer::evaluator::evaluate;
use rust_deal_analyzer::extraction::{ExtractOptions, Extractor, SourceFormat};
use rust_deal_analyzer::models::ListingRecord;
use rust_deal_analyzer::overrides::{AdditionalData, PropertyData};
use rust_deal_analyzer::report::{render_summary, temporary_property_id, DealReport};

#[derive(Parser)]
#[command(name = "deal-analyzer")]
#[command(about = "Extract a real estate listing and screen it against investment criteria")]
struct Cli {
    /// Listing file (email alert, PDF text, CSV, plain text)
    file: Option<PathBuf>,

    /// Source format by extension (pdf, csv, xlsx, txt, eml); defaults to FILE's extension
    #[arg(long)]
    format: Option<String>,

    /// Print the JSON report instead of the text summary
    #[arg(long)]
    json: bool,

    /// JSON file with STR metrics and monthly expense overrides
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// JSON file with a previously extracted property, analyzed instead of FILE
    #[arg(long)]
    property_data: Option<PathBuf>,

    /// Investment criteria document (overrides CRITERIA_PATH)
    #[arg(long)]
    criteria: Option<PathBuf>,
}

fn read_listing(cli: &Cli, config: &Config) -> Result<(ListingRecord, Option<String>)> {
    if let Some(path) = &cli.property_data {
        let record = PropertyData::load(path)
            .with_context(|| format!("Property data file '{}' not usable", path.display()))?;
        return Ok((record, None));
    }

    let path = cli
        .file
        .as_ref()
        .context("A listing FILE or --property-data is required")?;
    let format = match &cli.format {
        Some(ext) => SourceFormat::from_extension(ext)?,
        None => SourceFormat::from_path(path)?,
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("File '{}' not found", path.display()))?;
    if format == SourceFormat::Spreadsheet && std::str::from_utf8(&bytes).is_err() {
        anyhow::bail!(
            "Binary spreadsheets are not read directly; export '{}' as CSV and retry",
            path.display()
        );
    }
    let extractor = Extractor::new(ExtractOptions {
        header_lines: config.header_scan_lines,
    });
    let record = extractor.extract_bytes(&bytes, format)?;

    let file_type = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()));
    Ok((record, file_type))
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(criteria) = &cli.criteria {
        config.criteria_path = criteria.clone();
    }
    if cli.json {
        config.output = OutputFormat::Json;
    }

    let (mut record, file_type) = read_listing(&cli, &config)?;

    if let Some(path) = &cli.data_file {
        if path.exists() {
            let data = AdditionalData::load(path)?;
            record = record.with_overrides(&data);
        } else {
            tracing::warn!("Data file {} does not exist, ignoring", path.display());
        }
    }

    let criteria = load_criteria(&config.criteria_path)?;
    let analysis = evaluate(&record, &criteria);

    match config.output {
        OutputFormat::Json => {
            let report = DealReport::from_analysis(&analysis, temporary_property_id());
            println!("{}", serde_json::to_string(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", render_summary(&analysis, file_type.as_deref()));
        }
    }

    Ok(())
}

fn main() {
    // Logs go to stderr so the JSON report on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_deal_analyzer=info,deal_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error processing file: {:#}", e);
        std::process::exit(1);
    }
}

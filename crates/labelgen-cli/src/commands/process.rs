//! Process command - generate labels for a single order file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use labelgen_core::models::config::LabelConfig;
use labelgen_core::{Catalog, LabelRenderer, OrderExtraction, OrderParser, TextOrderParser};

use super::catalog::{CatalogSource, SourceArgs};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    source: SourceArgs,

    /// Production date printed on the labels, DD/MM/YYYY (default: today)
    #[arg(short, long, value_parser = parse_production_date)]
    date: Option<NaiveDate>,

    /// Labels PDF path (default: <output_dir>/<customer>_etiquetas.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the order summary printed to stdout
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Parse the order and print the summary without writing labels
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Parse a DD/MM/YYYY production date.
pub fn parse_production_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y")
        .map_err(|e| format!("expected DD/MM/YYYY: {}", e))
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let catalog = CatalogSource::resolve(&args.source, &config.catalog)?
        .load()
        .await?;

    let text = super::read_order_text(&args.input, &config)?;
    let extraction = TextOrderParser::from_config(&config.extraction).parse(&text, &catalog);

    print_warnings(&extraction);
    println!("{}", format_extraction(&extraction, args.format)?);

    if args.dry_run {
        debug!("Dry run, skipping label rendering");
        return Ok(());
    }

    if extraction.total_labels() == 0 {
        eprintln!(
            "{} No labels to print for {}",
            style("⚠").yellow(),
            args.input.display()
        );
        return Ok(());
    }

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config, &extraction));

    let page_count = render_labels(&extraction, &catalog, date, &config, &output_path, true)?;

    eprintln!(
        "{} {} labels written to {}",
        style("✓").green(),
        page_count,
        output_path.display()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Default labels path for an order.
pub fn default_output_path(config: &LabelConfig, extraction: &OrderExtraction) -> PathBuf {
    config
        .output
        .output_dir
        .join(config.labels_file_name(extraction.customer.as_deref()))
}

/// Render the merged labels PDF and write it to `output_path`.
pub fn render_labels(
    extraction: &OrderExtraction,
    catalog: &Catalog,
    date: NaiveDate,
    config: &LabelConfig,
    output_path: &Path,
    show_progress: bool,
) -> anyhow::Result<usize> {
    let pb = if show_progress {
        ProgressBar::new(extraction.total_labels())
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} labels")?
            .progress_chars("##-"),
    );

    let renderer = LabelRenderer::new(config.label.clone());
    let rendered = renderer.render_with_progress(extraction, catalog, date, |done, _| {
        pb.set_position(done as u64)
    })?;

    pb.finish_and_clear();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path, &rendered.bytes)?;
    debug!("Wrote {} bytes to {}", rendered.bytes.len(), output_path.display());

    Ok(rendered.page_count)
}

/// Print missing-customer and per-line warnings to stderr.
pub fn print_warnings(extraction: &OrderExtraction) {
    let warnings = extraction.warnings();
    if warnings.is_empty() {
        return;
    }

    eprintln!("{}", style("Warnings:").yellow());
    for warning in &warnings {
        eprintln!("  - {}", warning);
    }
}

/// Format an order summary.
pub fn format_extraction(
    extraction: &OrderExtraction,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_csv(extraction: &OrderExtraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["customer", "line", "id", "name", "quantity", "unit", "labels"])?;

    let customer = extraction.customer.clone().unwrap_or_default();
    for item in &extraction.items {
        wtr.write_record([
            &customer,
            &item.line_number.to_string(),
            &item.id.to_string(),
            &item.name,
            &item.quantity.normalize().to_string(),
            &item.unit.to_string(),
            &item.labels.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &OrderExtraction) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Customer: {}\n",
        extraction.customer.as_deref().unwrap_or("(not found)")
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &extraction.items {
        output.push_str(&format!(
            "  {:>6}  {:<30} {:>8} {:<3} -> {} labels\n",
            item.id,
            item.name,
            item.quantity.normalize(),
            item.unit,
            item.labels
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total labels: {}\n", extraction.total_labels()));
    output.push_str(&format!(
        "Lines: {} scanned, {} skipped, {} with problems\n",
        extraction.lines_scanned,
        extraction.lines_skipped,
        extraction.diagnostics.len()
    ));

    output
}

//! Batch processing command for multiple order files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use labelgen_core::models::config::LabelConfig;
use labelgen_core::{Catalog, OrderExtraction, OrderParser, TextOrderParser};

use super::catalog::{CatalogSource, SourceArgs};
use super::process::{format_extraction, parse_production_date, render_labels, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    source: SourceArgs,

    /// Output directory (default: configured output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Production date printed on the labels, DD/MM/YYYY (default: today)
    #[arg(short, long, value_parser = parse_production_date)]
    date: Option<NaiveDate>,

    /// Also write each order summary in this format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Parse orders without writing labels
    #[arg(long)]
    dry_run: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// State shared by every file of a batch.
struct BatchContext<'a> {
    parser: TextOrderParser,
    catalog: Catalog,
    date: NaiveDate,
    config: &'a LabelConfig,
    output_dir: PathBuf,
    dry_run: bool,
    taken_names: HashSet<String>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<OrderExtraction>,
    labels_path: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| super::is_order_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.output_dir.clone());
    fs::create_dir_all(&output_dir)?;

    // One snapshot for the whole batch.
    let catalog = CatalogSource::resolve(&args.source, &config.catalog)?
        .load()
        .await?;
    let mut context = BatchContext {
        parser: TextOrderParser::from_config(&config.extraction),
        catalog,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        config: &config,
        output_dir: output_dir.clone(),
        dry_run: args.dry_run,
        taken_names: HashSet::new(),
    };

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &mut context);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((extraction, labels_path)) => {
                results.push(ProcessResult {
                    path,
                    extraction: Some(extraction),
                    labels_path,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        extraction: None,
                        labels_path: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(format) = args.format {
        for result in &results {
            if let Some(extraction) = &result.extraction {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("order");
                let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));
                fs::write(&output_path, format_extraction(extraction, format)?)?;
                debug!("Wrote summary to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.extraction.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let total_labels: u64 = results
        .iter()
        .filter_map(|r| r.extraction.as_ref())
        .map(|e| e.total_labels())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} labels",
        style(successful).green(),
        style(failed.len()).red(),
        total_labels
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    context: &mut BatchContext<'_>,
) -> anyhow::Result<(OrderExtraction, Option<PathBuf>)> {
    let config = context.config;
    let text = super::read_order_text(path, config)?;
    let extraction = context.parser.parse(&text, &context.catalog);

    for warning in extraction.warnings() {
        warn!("{}: {}", path.display(), warning);
    }

    if context.dry_run || extraction.total_labels() == 0 {
        return Ok((extraction, None));
    }

    let file_name = labels_file_name(config, &extraction, path, &mut context.taken_names);
    let labels_path = context.output_dir.join(file_name);
    render_labels(&extraction, &context.catalog, context.date, config, &labels_path, false)?;

    Ok((extraction, Some(labels_path)))
}

/// Labels file name, unique within the batch. Orders without a customer are
/// named after the input file; a repeated name gets a counter.
fn labels_file_name(
    config: &LabelConfig,
    extraction: &OrderExtraction,
    path: &Path,
    taken: &mut HashSet<String>,
) -> String {
    let base = match extraction.customer.as_deref() {
        Some(customer) => config.labels_file_name(Some(customer)),
        None => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("order");
            let name = format!("{}_{}", config.output.missing_customer_name, stem);
            config.labels_file_name(Some(name.as_str()))
        }
    };

    let mut name = base.clone();
    let mut counter = 2;
    while taken.contains(&name) {
        let stem = base.strip_suffix(".pdf").unwrap_or(&base);
        name = format!("{}_{}.pdf", stem, counter);
        counter += 1;
    }

    if name != base {
        info!("{} already written in this batch, using {}", base, name);
    }
    taken.insert(name.clone());
    name
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "customer",
        "items",
        "labels",
        "problems",
        "labels_file",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            wtr.write_record([
                filename,
                "success",
                extraction.customer.as_deref().unwrap_or(""),
                &extraction.items.len().to_string(),
                &extraction.total_labels().to_string(),
                &extraction.diagnostics.len().to_string(),
                &result
                    .labels_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                &result.processing_time_ms.to_string(),
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
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels_file_name_without_customer() {
        let config = LabelConfig::default();
        let extraction = OrderExtraction::default();
        assert_eq!(
            labels_file_name(&config, &extraction, Path::new("in/pedido 12.pdf"), &mut HashSet::new()),
            "sem_cliente_pedido_12_etiquetas.pdf"
        );
    }

    #[test]
    fn test_labels_file_name_same_customer() {
        let config = LabelConfig::default();
        let extraction = OrderExtraction {
            customer: Some("Padaria Central".to_string()),
            ..Default::default()
        };
        let mut taken = HashSet::new();

        let names: Vec<String> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|file| labels_file_name(&config, &extraction, Path::new(file), &mut taken))
            .collect();
        assert_eq!(
            names,
            vec![
                "Padaria_Central_etiquetas.pdf",
                "Padaria_Central_etiquetas_2.pdf",
                "Padaria_Central_etiquetas_3.pdf",
            ]
        );
    }

    #[test]
    fn test_summary_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.txt"),
                extraction: Some(OrderExtraction {
                    customer: Some("Padaria".to_string()),
                    ..Default::default()
                }),
                labels_path: None,
                error: None,
                processing_time_ms: 3,
            },
            ProcessResult {
                path: PathBuf::from("b.pdf"),
                extraction: None,
                labels_path: None,
                error: Some("PDF has no pages".to_string()),
                processing_time_ms: 1,
            },
        ];

        write_summary(&path, &results).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.txt,success,Padaria,0,0,0,,3,");
        assert_eq!(lines[2], "b.pdf,error,,,,,,1,PDF has no pages");
    }
}

//! Extract command - locate configured fields in one block dump.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde_json::Value;
use tracing::{debug, info};

use taxfx_core::amounts::coerce_values;
use taxfx_core::pdf::{BlockSource, JsonBlockDump};
use taxfx_core::{extract_fields, AnchorConfiguration};

use super::{anchors_file, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Block dump (JSON) of the document's pages
    #[arg(required = true)]
    blocks: PathBuf,

    /// Anchor configuration file
    #[arg(short, long, conflicts_with = "year")]
    anchors: Option<PathBuf>,

    /// Form year; selects <anchors_dir>/<prefix>_<year>.json
    #[arg(short, long)]
    year: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Convert amount-like values to numbers
    #[arg(long)]
    numeric: bool,

    /// Source PDF the dump was taken from; recorded as `_meta.source_pdf`
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Record that the dump came from an OCR'd copy (see `taxfx probe --ensure`)
    #[arg(long, requires = "pdf")]
    used_ocr: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
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

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.blocks.exists() {
        anyhow::bail!("Block dump not found: {}", args.blocks.display());
    }

    let anchors_path = anchors_file(args.anchors.as_deref(), args.year.as_deref(), &config)?;
    let anchors = AnchorConfiguration::from_file(&anchors_path, &config.extraction)?;
    let pages = JsonBlockDump::from_file(&args.blocks)?.pages()?;

    info!("Extracting {} fields from {}", anchors.fields.len(), args.blocks.display());

    let mut result = extract_fields(&pages, &anchors)?;

    if let Some(pdf) = &args.pdf {
        let source = fs::canonicalize(pdf).unwrap_or_else(|_| pdf.clone());
        result = result
            .with_meta("used_ocr", args.used_ocr)
            .with_meta("source_pdf", source.display().to_string());
    }

    let mut json = result.to_json_value();
    if args.numeric {
        coerce_values(&mut json);
    }

    let output = render(&json, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Parsed output saved to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a serialized extraction result.
pub fn render(result: &Value, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn evidence(result: &Value) -> &[Value] {
    result["_evidence"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn format_csv(result: &Value) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["key", "label", "value", "page", "strategy", "note"])?;

    for entry in evidence(result) {
        let key = cell(&entry["key"]);
        let value = cell(&result[key.as_str()]);
        wtr.write_record([
            key,
            cell(&entry["label"]),
            value,
            cell(&entry["page"]),
            cell(&entry["strategy"]),
            cell(&entry["note"]),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &Value) -> String {
    let mut output = String::new();

    let meta = &result["_meta"];
    output.push_str(&format!("Pages: {}\n", cell(&meta["pages"])));
    if !meta["anchors_year"].is_null() {
        output.push_str(&format!("Anchors year: {}\n", cell(&meta["anchors_year"])));
    }
    output.push('\n');

    let entries = evidence(result);
    let width = entries
        .iter()
        .filter_map(|e| e["key"].as_str())
        .map(str::len)
        .max()
        .unwrap_or(0);

    for entry in entries {
        let key = cell(&entry["key"]);
        let value = &result[key.as_str()];
        if value.is_null() {
            output.push_str(&format!("  {:<width$}  -\n", key, width = width));
        } else {
            output.push_str(&format!(
                "  {:<width$}  {}  (page {}, {})\n",
                key,
                cell(value),
                cell(&entry["page"]),
                cell(&entry["strategy"]),
                width = width
            ));
        }
    }

    output
}

//! Probe command - report a PDF's text layer and optionally make it searchable.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use taxfx_core::pdf::{OcrMyPdfGuarantor, PdfProbe, TextLayerGuarantor};

use super::load_config;

/// Arguments for the probe command.
#[derive(Args)]
pub struct ProbeArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Characters of embedded text needed to count as searchable
    #[arg(long)]
    min_chars: Option<usize>,

    /// Run OCR when the text layer is missing
    #[arg(long)]
    ensure: bool,

    /// Where to copy the searchable PDF (with --ensure)
    #[arg(short, long, requires = "ensure")]
    output: Option<PathBuf>,
}

pub async fn run(args: ProbeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(min_chars) = args.min_chars {
        config.text_layer.min_chars = min_chars;
    }

    if !args.input.exists() {
        anyhow::bail!("File not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let mut probe = PdfProbe::new();
    probe.load(&data)?;
    let report = probe.text_layer(config.text_layer.min_chars)?;

    println!("Pages: {}", report.pages);
    println!("Text characters: {}", report.text_chars);
    println!(
        "Searchable: {}",
        if report.meaningful {
            style("yes").green()
        } else {
            style("no").yellow()
        }
    );

    if !args.ensure {
        return Ok(());
    }

    let guarantor = OcrMyPdfGuarantor::new(config.text_layer);
    let searchable = guarantor.ensure_searchable(&args.input)?;
    info!("Searchable copy at {}", searchable.path().display());

    if searchable.used_ocr() {
        println!(
            "{} OCR was used to create a searchable copy of the PDF.",
            style("ℹ").blue()
        );
    }

    if let Some(output) = &args.output {
        fs::copy(searchable.path(), output)?;
        println!(
            "{} Searchable PDF saved to {}",
            style("✓").green(),
            output.display()
        );
    }

    Ok(())
}

//! Years command - list form years that have anchor files.

use std::path::PathBuf;

use clap::Args;
use console::style;

use taxfx_core::catalog::available_years;

use super::load_config;

/// Arguments for the years command.
#[derive(Args)]
pub struct YearsArgs {
    /// Anchor directory (default from configuration)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Anchor file prefix (default from configuration)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Print `{"years": [...]}`
    #[arg(long)]
    json: bool,
}

pub async fn run(args: YearsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let dir = args.dir.unwrap_or(config.anchors.anchors_dir);
    let prefix = args.prefix.unwrap_or(config.anchors.file_prefix);

    let years = available_years(&dir, &prefix)?;

    if args.json {
        println!("{}", serde_json::json!({ "years": years }));
    } else if years.is_empty() {
        println!(
            "{} No {} anchor files in {}",
            style("ℹ").blue(),
            prefix,
            dir.display()
        );
    } else {
        for year in &years {
            println!("{}", year);
        }
    }

    Ok(())
}

//! CLI application for anchor-based tax-form field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, blocks, config, extract, probe, years};

/// taxfx - Locate labeled values on tax forms from positioned text blocks
#[derive(Parser)]
#[command(name = "taxfx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single block dump
    Extract(extract::ExtractArgs),

    /// Extract fields from multiple block dumps
    Batch(batch::BatchArgs),

    /// Print the text blocks of a dump
    Blocks(blocks::BlocksArgs),

    /// Check whether a PDF has a usable text layer
    Probe(probe::ProbeArgs),

    /// List form years with anchor files
    Years(years::YearsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Blocks(args) => blocks::run(args).await,
        Commands::Probe(args) => probe::run(args, config_path).await,
        Commands::Years(args) => years::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}

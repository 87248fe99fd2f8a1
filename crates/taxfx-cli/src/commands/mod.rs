//! Subcommands of the `taxfx` binary.

pub mod batch;
pub mod blocks;
pub mod config;
pub mod extract;
pub mod probe;
pub mod years;

use std::path::{Path, PathBuf};

use tracing::debug;

use taxfx_core::models::config::TaxfxConfig;

/// Load the configuration given by `--config`, else the user's config file,
/// else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TaxfxConfig> {
    if let Some(path) = config_path {
        return Ok(TaxfxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(TaxfxConfig::from_file(&default_path)?)
    } else {
        Ok(TaxfxConfig::default())
    }
}

/// Anchor file chosen by `--anchors`, or by `--year` within the catalog.
pub fn anchors_file(
    anchors: Option<&Path>,
    year: Option<&str>,
    config: &TaxfxConfig,
) -> anyhow::Result<PathBuf> {
    let path = match (anchors, year) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(year)) => config.anchors_path(year),
        (None, None) => anyhow::bail!("Either --anchors or --year is required"),
    };

    if !path.exists() {
        anyhow::bail!("Anchors file not found: {}", path.display());
    }
    Ok(path)
}

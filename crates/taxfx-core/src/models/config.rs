//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::anchors::ToleranceDefaults;

/// Main configuration for the taxfx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxfxConfig {
    /// Defaults applied to anchor entries that leave values unset.
    pub extraction: ToleranceDefaults,

    /// Text-layer guarantee configuration.
    pub text_layer: TextLayerConfig,

    /// Anchor file catalog configuration.
    pub anchors: AnchorsConfig,
}

/// Searchable-PDF normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayerConfig {
    /// Minimum characters of embedded text to treat a PDF as searchable.
    pub min_chars: usize,

    /// Pass `--force-ocr` to ocrmypdf, rasterizing any existing text.
    pub force_ocr: bool,

    /// Decrypt and flatten with qpdf/ghostscript before OCR.
    pub flatten: bool,

    /// qpdf executable.
    pub qpdf_bin: String,

    /// Ghostscript executable.
    pub gs_bin: String,

    /// ocrmypdf executable.
    pub ocrmypdf_bin: String,
}

impl Default for TextLayerConfig {
    fn default() -> Self {
        Self {
            min_chars: 200,
            force_ocr: true,
            flatten: true,
            qpdf_bin: "qpdf".to_string(),
            gs_bin: "gs".to_string(),
            ocrmypdf_bin: "ocrmypdf".to_string(),
        }
    }
}

/// Where anchor configuration files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorsConfig {
    /// Directory containing `<prefix>_<year>.json` files.
    pub anchors_dir: PathBuf,

    /// Form prefix of anchor file names.
    pub file_prefix: String,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            anchors_dir: PathBuf::from("anchors"),
            file_prefix: "1040".to_string(),
        }
    }
}

impl TaxfxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Path of the anchor file for `year`.
    pub fn anchors_path(&self, year: &str) -> PathBuf {
        crate::catalog::anchors_path(&self.anchors.anchors_dir, &self.anchors.file_prefix, year)
    }
}

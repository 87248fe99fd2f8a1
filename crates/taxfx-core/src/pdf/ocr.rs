//! Searchable-PDF guarantee backed by qpdf, ghostscript and ocrmypdf.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::probe::has_meaningful_text;
use super::{SearchablePdf, TextLayerGuarantor};
use crate::error::TextLayerError;
use crate::models::config::TextLayerConfig;

/// Guarantor that OCRs documents lacking a usable text layer.
pub struct OcrMyPdfGuarantor {
    config: TextLayerConfig,
}

impl OcrMyPdfGuarantor {
    pub fn new(config: TextLayerConfig) -> Self {
        Self { config }
    }

    fn run_tool(&self, tool: &str, args: &[&str]) -> Result<(), TextLayerError> {
        debug!("Running {} {}", tool, args.join(" "));

        let output = Command::new(tool)
            .args(args)
            .output()
            .map_err(|e| TextLayerError::Spawn {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            debug!("{} stderr: {}", tool, String::from_utf8_lossy(&output.stderr).trim());
            return Err(TextLayerError::ToolFailed {
                tool: tool.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(())
    }

    /// Decrypt/normalize then flatten; each step is skipped when its tool fails.
    fn flatten(&self, input: &Path, workdir: &Path) -> PathBuf {
        let input_str = input.to_string_lossy().into_owned();

        let normalized = workdir.join("normalized.pdf");
        let normalized_str = normalized.to_string_lossy().into_owned();
        let src = match self.run_tool(
            &self.config.qpdf_bin,
            &["--decrypt", "--force-version=1.7", input_str.as_str(), normalized_str.as_str()],
        ) {
            Ok(()) => normalized,
            Err(e) => {
                debug!("Skipping qpdf normalization: {}", e);
                input.to_path_buf()
            }
        };

        let flattened = workdir.join("flattened.pdf");
        let src_str = src.to_string_lossy().into_owned();
        let out_arg = format!("-o{}", flattened.to_string_lossy());
        match self.run_tool(
            &self.config.gs_bin,
            &[out_arg.as_str(), "-sDEVICE=pdfwrite", "-dPDFSETTINGS=/prepress", src_str.as_str()],
        ) {
            Ok(()) => flattened,
            Err(e) => {
                debug!("Skipping ghostscript flattening: {}", e);
                src
            }
        }
    }

    fn ocr(&self, input: &Path, output: &Path) -> Result<(), TextLayerError> {
        let input_str = input.to_string_lossy().into_owned();
        let output_str = output.to_string_lossy().into_owned();

        let mut args: Vec<&str> = Vec::new();
        if self.config.force_ocr {
            args.push("--force-ocr");
        }
        args.extend(["--rotate-pages", "--deskew", "--remove-background"]);
        args.push(input_str.as_str());
        args.push(output_str.as_str());

        self.run_tool(&self.config.ocrmypdf_bin, &args)
    }
}

impl TextLayerGuarantor for OcrMyPdfGuarantor {
    fn ensure_searchable(&self, path: &Path) -> crate::Result<SearchablePdf> {
        let data = std::fs::read(path).map_err(|e| TextLayerError::Input {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        match has_meaningful_text(&data, self.config.min_chars) {
            Ok(true) => return Ok(SearchablePdf::original(path)),
            Ok(false) => debug!("{} has no usable text layer", path.display()),
            Err(e) => warn!("Could not probe {}: {}", path.display(), e),
        }

        let workdir = TempDir::new()?;
        let src = if self.config.flatten {
            self.flatten(path, workdir.path())
        } else {
            path.to_path_buf()
        };

        let ocr_output = workdir.path().join("ocr.pdf");
        match self.ocr(&src, &ocr_output) {
            Ok(()) => {
                info!("OCR produced a searchable copy of {}", path.display());
                Ok(SearchablePdf::derived(ocr_output, true, workdir))
            }
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                if src.as_path() == path {
                    Ok(SearchablePdf::original(path))
                } else {
                    Ok(SearchablePdf::derived(src, false, workdir))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaxfxError;

    fn missing_tools() -> TextLayerConfig {
        TextLayerConfig {
            qpdf_bin: "taxfx-test-missing-qpdf".to_string(),
            gs_bin: "taxfx-test-missing-gs".to_string(),
            ocrmypdf_bin: "taxfx-test-missing-ocrmypdf".to_string(),
            ..TextLayerConfig::default()
        }
    }

    #[test]
    fn test_missing_tools_fall_back_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        std::fs::write(&input, b"not really a pdf").unwrap();

        let guarantor = OcrMyPdfGuarantor::new(missing_tools());
        let searchable = guarantor.ensure_searchable(&input).unwrap();

        assert_eq!(searchable.path(), input.as_path());
        assert!(!searchable.used_ocr());
    }

    #[test]
    fn test_missing_input() {
        let guarantor = OcrMyPdfGuarantor::new(missing_tools());
        let err = guarantor
            .ensure_searchable(Path::new("/nonexistent/taxfx/input.pdf"))
            .unwrap_err();

        assert!(matches!(err, TaxfxError::TextLayer(TextLayerError::Input { .. })));
    }

    #[test]
    fn test_spawn_error() {
        let guarantor = OcrMyPdfGuarantor::new(missing_tools());
        let err = guarantor.run_tool("taxfx-test-missing-tool", &[]).unwrap_err();
        assert!(matches!(err, TextLayerError::Spawn { .. }));
    }
}

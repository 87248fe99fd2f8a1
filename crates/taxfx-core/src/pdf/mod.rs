//! PDF collaborators: text-layer probing, searchable-PDF guarantee, and
//! positioned text block sources.

mod blocks;
#[cfg(feature = "native")]
mod ocr;
mod probe;

pub use blocks::JsonBlockDump;
#[cfg(feature = "native")]
pub use ocr::OcrMyPdfGuarantor;
pub use probe::{has_meaningful_text, PdfProbe, TextLayerReport};

use std::path::{Path, PathBuf};

use crate::error::PdfError;
use crate::models::block::Page;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A PDF known to carry a text layer.
///
/// Derived copies live in a temporary directory that is removed when this
/// value is dropped.
#[derive(Debug)]
pub struct SearchablePdf {
    path: PathBuf,
    used_ocr: bool,
    #[cfg(feature = "native")]
    _workdir: Option<tempfile::TempDir>,
}

impl SearchablePdf {
    /// The input itself was already searchable.
    pub fn original(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            used_ocr: false,
            #[cfg(feature = "native")]
            _workdir: None,
        }
    }

    /// A normalized or OCR'd copy stored inside `workdir`.
    #[cfg(feature = "native")]
    pub fn derived(path: PathBuf, used_ocr: bool, workdir: tempfile::TempDir) -> Self {
        Self {
            path,
            used_ocr,
            _workdir: Some(workdir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn used_ocr(&self) -> bool {
        self.used_ocr
    }
}

/// Makes sure a PDF has a usable text layer before block extraction.
pub trait TextLayerGuarantor {
    fn ensure_searchable(&self, path: &Path) -> crate::Result<SearchablePdf>;
}

/// Supplies the positioned text blocks of a document, one entry per page.
pub trait BlockSource {
    fn pages(&self) -> crate::Result<Vec<Page>>;
}

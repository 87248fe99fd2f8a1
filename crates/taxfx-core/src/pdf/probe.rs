//! Text-layer probing using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;

/// Loaded PDF whose embedded text can be measured.
pub struct PdfProbe {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Summary of a document's embedded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayerReport {
    /// Number of pages.
    pub pages: u32,
    /// Characters of trimmed page text counted before stopping.
    pub text_chars: usize,
    /// Whether `text_chars` reached the threshold.
    pub meaningful: bool,
}

impl PdfProbe {
    /// Create an empty probe.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Parse a PDF from memory.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Count embedded text page by page, stopping once `min_chars` is reached.
    pub fn text_layer(&self, min_chars: usize) -> Result<TextLayerReport> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut text_chars = 0;
        let mut readable_pages = 0;

        for page in &page_numbers {
            match doc.extract_text(&[*page]) {
                Ok(text) => {
                    readable_pages += 1;
                    text_chars += text.trim().chars().count();
                }
                Err(e) => trace!("No text layer on page {}: {}", page, e),
            }
            if text_chars >= min_chars {
                break;
            }
        }

        // lopdf cannot decode every font encoding; retry on the whole document.
        if readable_pages == 0 {
            text_chars = self.extract_text()?.trim().chars().count();
        }

        let report = TextLayerReport {
            pages: page_numbers.len() as u32,
            text_chars,
            meaningful: text_chars >= min_chars,
        };
        debug!(
            "Text layer: {} pages, {} chars -> meaningful={}",
            report.pages, report.text_chars, report.meaningful
        );
        Ok(report)
    }

    /// Full embedded text of the document.
    pub fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

impl Default for PdfProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe a PDF held in memory.
pub fn has_meaningful_text(data: &[u8], min_chars: usize) -> Result<bool> {
    let mut probe = PdfProbe::new();
    probe.load(data)?;
    Ok(probe.text_layer(min_chars)?.meaningful)
}

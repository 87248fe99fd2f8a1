//! Core library for anchor-based tax-form field extraction.
//!
//! This crate provides:
//! - Anchor configurations (field key, printed label, search strategy, tolerances)
//! - Label matching and directional value search over positioned text blocks
//! - Multi-page field resolution with a per-field evidence trail
//! - Amount sanitization for numeric output
//! - Text-layer probing and a searchable-PDF guarantee (qpdf/ghostscript/ocrmypdf)

pub mod amounts;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod locate;
pub mod models;
pub mod patterns;
pub mod pdf;

pub use error::{BlockError, ConfigError, PdfError, Result, TaxfxError, TextLayerError};
pub use extract::{extract_fields, resolve_field, Resolution};
pub use locate::{find_anchor, locate_field, LocatedValue, ValueLocator};
pub use models::anchors::{AnchorConfiguration, AnchorYear, FieldSpec, Strategy, Tolerance, ToleranceDefaults};
pub use models::block::{BoundingBox, Page, TextBlock};
pub use models::config::TaxfxConfig;
pub use models::result::{Evidence, ExtractionMeta, ExtractionResult};
pub use patterns::is_numeric_like;
pub use pdf::{BlockSource, JsonBlockDump, SearchablePdf, TextLayerGuarantor};
#[cfg(feature = "native")]
pub use pdf::OcrMyPdfGuarantor;

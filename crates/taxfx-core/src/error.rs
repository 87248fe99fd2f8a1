//! Error types for the taxfx-core library.

use thiserror::Error;

/// Main error type for the taxfx library.
#[derive(Error, Debug)]
pub enum TaxfxError {
    /// Anchor configuration is malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Block dump could not be turned into pages.
    #[error("block error: {0}")]
    Blocks(#[from] BlockError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Text layer could not be guaranteed.
    #[error("text layer error: {0}")]
    TextLayer(#[from] TextLayerError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating an anchor configuration.
///
/// These are the only hard failures of an extraction run, and they are
/// reported before any page is scanned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The document could not be parsed at all.
    #[error("failed to parse anchor configuration: {0}")]
    Parse(String),

    /// A field entry lacks a required key.
    #[error("field #{index}: missing required key `{key}`")]
    MissingKey { index: usize, key: &'static str },

    /// A required key is present but blank.
    #[error("field #{index}: `{key}` must not be empty")]
    EmptyValue { index: usize, key: &'static str },

    /// Two fields share the same output key.
    #[error("field #{index}: duplicate key `{key}`")]
    DuplicateKey { index: usize, key: String },

    /// A field key collides with `_meta` or `_evidence`.
    #[error("field #{index}: key `{key}` is reserved")]
    ReservedKey { index: usize, key: String },

    /// The strategy name is not one of `right`, `below`, `nearest_numeric`.
    #[error("field `{key}`: unknown strategy `{strategy}`")]
    UnknownStrategy { key: String, strategy: String },

    /// A slack value is negative or not a finite number.
    #[error("field `{key}`: invalid {name} {value}")]
    InvalidSlack {
        key: String,
        name: &'static str,
        value: f64,
    },
}

/// Errors related to block dumps produced by the extraction service.
#[derive(Error, Debug)]
pub enum BlockError {
    /// A block tuple was too short or had the wrong item types.
    #[error("malformed block: {0}")]
    Malformed(String),

    /// A bounding box violates `x0 <= x1`, `y0 <= y1` or is not finite.
    #[error("invalid bounding box ({x0}, {y0}, {x1}, {y1})")]
    InvalidBoundingBox { x0: f64, y0: f64, x1: f64, y1: f64 },

    /// Pages are numbered from 1.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to PDF probing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised by a text-layer guarantor.
#[derive(Error, Debug)]
pub enum TextLayerError {
    /// The input document does not exist or cannot be read.
    #[error("cannot read {path}: {reason}")]
    Input { path: String, reason: String },

    /// An external tool could not be started.
    #[error("failed to run {tool}: {reason}")]
    Spawn { tool: String, reason: String },

    /// An external tool exited unsuccessfully.
    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: String },
}

/// Result type for the taxfx library.
pub type Result<T> = std::result::Result<T, TaxfxError>;

//! Extraction results and their evidence trail.

use indexmap::IndexMap;
use serde::Serialize;

use super::anchors::{AnchorYear, Strategy};
use super::block::BoundingBox;

/// Note attached to evidence of unresolved fields.
pub const NOT_FOUND_NOTE: &str = "not found";

/// How (or whether) one field's value was located.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub key: String,
    pub label: String,
    /// Page the value was found on.
    pub page: Option<u32>,
    /// Bounds of the value block.
    pub bbox: Option<BoundingBox>,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Evidence {
    pub fn found(key: &str, label: &str, strategy: Strategy, page: u32, bbox: BoundingBox) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            page: Some(page),
            bbox: Some(bbox),
            strategy,
            note: None,
        }
    }

    pub fn not_found(key: &str, label: &str, strategy: Strategy) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            page: None,
            bbox: None,
            strategy,
            note: Some(NOT_FOUND_NOTE.to_string()),
        }
    }

    pub fn is_found(&self) -> bool {
        self.page.is_some()
    }
}

/// Run metadata, serialized as `_meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionMeta {
    /// Number of pages in the input.
    pub pages: usize,
    /// Year tag of the anchor configuration.
    pub anchors_year: Option<AnchorYear>,
    /// Entries added by the caller, e.g. `used_ocr`.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Field values plus evidence, in configuration order.
///
/// Serializes as `{"_meta": {...}, "<key>": value|null, ..., "_evidence": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "_meta")]
    meta: ExtractionMeta,
    #[serde(flatten)]
    values: IndexMap<String, Option<String>>,
    #[serde(rename = "_evidence")]
    evidence: Vec<Evidence>,
}

impl ExtractionResult {
    pub(crate) fn new(
        meta: ExtractionMeta,
        values: IndexMap<String, Option<String>>,
        evidence: Vec<Evidence>,
    ) -> Self {
        Self {
            meta,
            values,
            evidence,
        }
    }

    /// Value of `key`; `None` if unresolved or unknown.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// All values in configuration order.
    pub fn values(&self) -> &IndexMap<String, Option<String>> {
        &self.values
    }

    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    /// Evidence record of `key`.
    pub fn evidence_for(&self, key: &str) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.key == key)
    }

    pub fn meta(&self) -> &ExtractionMeta {
        &self.meta
    }

    /// Number of fields with a value.
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    /// Attach a caller-supplied metadata entry such as `used_ocr`.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta.extra.insert(key.into(), value.into());
        self
    }

    /// Serialize to a JSON value in wire order.
    pub fn to_json_value(&self) -> serde_json::Value {
        // Every member serializes infallibly (string keys, finite floats).
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

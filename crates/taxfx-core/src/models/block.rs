//! Text blocks as produced by the page extraction service.

use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// Axis-aligned rectangle in page coordinates, y growing downward.
///
/// Serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        debug_assert!(x0 <= x1 && y0 <= y1, "inverted bounding box");
        Self { x0, y0, x1, y1 }
    }

    /// Create a bounding box, rejecting inverted or non-finite corners.
    pub fn try_new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, BlockError> {
        let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
        if !finite || x0 > x1 || y0 > y1 {
            return Err(BlockError::InvalidBoundingBox { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Vertical offset between the top edges of two boxes.
    pub fn row_distance(&self, other: &BoundingBox) -> f64 {
        (self.y0 - other.y0).abs()
    }

    /// Manhattan distance between the top-left corners of two boxes.
    pub fn corner_distance(&self, other: &BoundingBox) -> f64 {
        (self.y0 - other.y0).abs() + (self.x0 - other.x0).abs()
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = BlockError;

    fn try_from([x0, y0, x1, y1]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::try_new(x0, y0, x1, y1)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// One block of recognized text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct TextBlock {
    /// Block bounds.
    pub bbox: BoundingBox,
    /// Literal block content, possibly multi-line.
    pub text: String,
}

impl TextBlock {
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    /// Whether the block carries anything besides whitespace.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Wire forms accepted for a block: a record, or the extraction service's
/// `[x0, y0, x1, y1, text, block_no, block_type]` tuple.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlock {
    Record { bbox: BoundingBox, text: String },
    Tuple(Vec<serde_json::Value>),
}

impl TryFrom<RawBlock> for TextBlock {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        match raw {
            RawBlock::Record { bbox, text } => Ok(TextBlock { bbox, text }),
            RawBlock::Tuple(items) => {
                if items.len() < 5 {
                    return Err(BlockError::Malformed(format!(
                        "expected at least 5 items, got {}",
                        items.len()
                    )));
                }

                let mut coords = [0.0f64; 4];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = items[i].as_f64().ok_or_else(|| {
                        BlockError::Malformed(format!("item {} is not a number: {}", i, items[i]))
                    })?;
                }

                let text = match &items[4] {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => {
                        return Err(BlockError::Malformed(format!(
                            "item 4 is not a string: {}",
                            other
                        )))
                    }
                };

                Ok(TextBlock {
                    bbox: BoundingBox::try_from(coords)?,
                    text,
                })
            }
        }
    }
}

/// An ordered sequence of blocks plus its 1-based page number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed).
    #[serde(rename = "page", alias = "page_number")]
    pub number: u32,
    /// Blocks in extraction order.
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl Page {
    pub fn new(number: u32, blocks: Vec<TextBlock>) -> Self {
        Self { number, blocks }
    }
}

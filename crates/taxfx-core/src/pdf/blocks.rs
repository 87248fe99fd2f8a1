//! Block dumps written by the page extraction service.
//!
//! A dump is either a bare array of pages or an object with a `pages`
//! array. Each page carries its 1-based number and its blocks, as records
//! or as `[x0, y0, x1, y1, text, block_no, block_type]` tuples.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::BlockSource;
use crate::error::BlockError;
use crate::models::block::Page;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDump {
    Pages(Vec<Page>),
    Document { pages: Vec<Page> },
}

/// Pages loaded from a JSON block dump.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBlockDump {
    pages: Vec<Page>,
}

impl JsonBlockDump {
    /// Parse a dump from a JSON string.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let raw: RawDump = serde_json::from_str(json)?;
        let pages = match raw {
            RawDump::Pages(pages) | RawDump::Document { pages } => pages,
        };

        if let Some(page) = pages.iter().find(|p| p.number == 0) {
            return Err(BlockError::InvalidPage(page.number).into());
        }

        Ok(Self { pages })
    }

    /// Load a dump from a file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dump = Self::from_json_str(&content)?;
        debug!(
            "Loaded {} pages ({} blocks) from {}",
            dump.pages.len(),
            dump.block_count(),
            path.display()
        );
        Ok(dump)
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

impl BlockSource for JsonBlockDump {
    fn pages(&self) -> crate::Result<Vec<Page>> {
        Ok(self.pages.clone())
    }
}

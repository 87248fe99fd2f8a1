//! Field extraction across a document's pages.

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::error::ConfigError;
use crate::locate::locate_field;
use crate::models::anchors::{AnchorConfiguration, FieldSpec};
use crate::models::block::{BoundingBox, Page};
use crate::models::result::{Evidence, ExtractionMeta, ExtractionResult};

/// Outcome of resolving one field against the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Page the value was found on.
    pub page: u32,
    /// Trimmed value text.
    pub value: String,
    /// Bounds of the value block.
    pub bbox: BoundingBox,
}

/// Resolve `field` against pages already in page-number order.
///
/// The first page yielding a non-empty value wins; later pages are not
/// searched.
pub fn resolve_field(pages: &[&Page], field: &FieldSpec) -> Option<Resolution> {
    for page in pages {
        match locate_field(&page.blocks, field) {
            Some(found) => {
                let value = found.value.text.trim();
                if value.is_empty() {
                    continue;
                }
                return Some(Resolution {
                    page: page.number,
                    value: value.to_string(),
                    bbox: found.value.bbox,
                });
            }
            None => trace!("Field {} not on page {}", field.key, page.number),
        }
    }
    None
}

/// Extract every configured field from `pages`.
///
/// The configuration is validated before any page is scanned. Fields that
/// cannot be located are recorded as `null` with a "not found" evidence
/// note; they never fail the run.
pub fn extract_fields(
    pages: &[Page],
    configuration: &AnchorConfiguration,
) -> Result<ExtractionResult, ConfigError> {
    configuration.validate()?;

    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by_key(|p| p.number);

    let mut values = IndexMap::with_capacity(configuration.fields.len());
    let mut evidence = Vec::with_capacity(configuration.fields.len());

    for field in &configuration.fields {
        match resolve_field(&ordered, field) {
            Some(resolution) => {
                debug!(
                    "Resolved {} on page {} via {}",
                    field.key, resolution.page, field.strategy
                );
                evidence.push(Evidence::found(
                    &field.key,
                    &field.label,
                    field.strategy,
                    resolution.page,
                    resolution.bbox,
                ));
                values.insert(field.key.clone(), Some(resolution.value));
            }
            None => {
                debug!("Field {} not found", field.key);
                evidence.push(Evidence::not_found(&field.key, &field.label, field.strategy));
                values.insert(field.key.clone(), None);
            }
        }
    }

    let result = ExtractionResult::new(
        ExtractionMeta {
            pages: pages.len(),
            anchors_year: configuration.year.clone(),
            extra: IndexMap::new(),
        },
        values,
        evidence,
    );

    info!(
        "Extracted {}/{} fields from {} pages",
        result.found_count(),
        configuration.fields.len(),
        pages.len()
    );

    Ok(result)
}

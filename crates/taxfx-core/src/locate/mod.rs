//! Anchor-based value location on a single page.

mod anchor;
mod strategies;

pub use anchor::{find_anchor, AnchorMatcher};
pub use strategies::{Below, NearestNumeric, RightOf, ValueLocator};

use crate::models::anchors::{FieldSpec, Strategy};
use crate::models::block::TextBlock;

/// Anchor and value blocks found for one field on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedValue<'a> {
    /// Block that matched the field's label.
    pub anchor: &'a TextBlock,
    /// Block selected as the field's value.
    pub value: &'a TextBlock,
}

impl FieldSpec {
    /// Locator configured with this field's strategy and tolerance.
    pub fn locator(&self) -> Box<dyn ValueLocator> {
        match self.strategy {
            Strategy::Right => Box::new(RightOf {
                y_slack: self.tolerance.y_slack,
            }),
            Strategy::Below => Box::new(Below {
                x_slack: self.tolerance.x_slack,
            }),
            Strategy::NearestNumeric => Box::new(NearestNumeric {
                y_slack: self.tolerance.y_slack,
                prefer_right: self.prefer_right,
            }),
        }
    }
}

/// Find `field`'s value among one page's blocks.
///
/// Returns `None` both when the label is absent and when no block satisfies
/// the strategy's constraints.
pub fn locate_field<'a>(blocks: &'a [TextBlock], field: &FieldSpec) -> Option<LocatedValue<'a>> {
    let anchor = find_anchor(blocks, &field.label)?;
    let value = field.locator().locate(&anchor.bbox, blocks)?;
    Some(LocatedValue { anchor, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::BoundingBox;
    use pretty_assertions::assert_eq;

    fn block(x0: f64, y0: f64, x1: f64, y1: f64, text: &str) -> TextBlock {
        TextBlock::new(BoundingBox::new(x0, y0, x1, y1), text)
    }

    #[test]
    fn test_locate_field_dispatches_strategy() {
        let blocks = vec![
            block(100.0, 100.0, 200.0, 110.0, "Filing status"),
            block(220.0, 100.0, 300.0, 110.0, "Single"),
            block(100.0, 120.0, 200.0, 130.0, "Married"),
        ];

        let right = FieldSpec::new("status", "filing status", Strategy::Right);
        let below = FieldSpec::new("status", "filing status", Strategy::Below);

        let found = locate_field(&blocks, &right).unwrap();
        assert_eq!(found.anchor.text, "Filing status");
        assert_eq!(found.value.text, "Single");
        assert_eq!(locate_field(&blocks, &below).unwrap().value.text, "Married");
    }

    #[test]
    fn test_no_fallback_for_right() {
        // A numeric block exists off-row; `right` must not borrow the
        // nearest-numeric fallback.
        let blocks = vec![
            block(100.0, 100.0, 200.0, 110.0, "Wages"),
            block(100.0, 500.0, 200.0, 510.0, "1,000"),
        ];

        let right = FieldSpec::new("wages", "wages", Strategy::Right);
        assert!(locate_field(&blocks, &right).is_none());

        let nearest = FieldSpec::new("wages", "wages", Strategy::NearestNumeric);
        assert_eq!(locate_field(&blocks, &nearest).unwrap().value.text, "1,000");
    }

    #[test]
    fn test_tolerance_is_honored() {
        let blocks = vec![
            block(100.0, 100.0, 200.0, 110.0, "Wages"),
            block(300.0, 130.0, 350.0, 140.0, "1,000"),
        ];

        let tight = FieldSpec::new("wages", "wages", Strategy::Right).with_y_slack(20.0);
        assert!(locate_field(&blocks, &tight).is_none());

        let loose = FieldSpec::new("wages", "wages", Strategy::Right).with_y_slack(30.0);
        assert!(locate_field(&blocks, &loose).is_some());
    }
}

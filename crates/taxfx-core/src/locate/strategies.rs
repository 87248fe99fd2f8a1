//! Directional value search around an anchor block.

use std::cmp::Ordering;

use crate::models::block::{BoundingBox, TextBlock};
use crate::patterns::is_numeric_like;

/// Picks the value block for an anchor under one geometric rule.
pub trait ValueLocator {
    /// Best candidate among `blocks` for the anchor at `anchor`.
    fn locate<'a>(&self, anchor: &BoundingBox, blocks: &'a [TextBlock]) -> Option<&'a TextBlock>;
}

/// Nearest non-empty block strictly right of the anchor, on its row band.
#[derive(Debug, Clone, Copy)]
pub struct RightOf {
    pub y_slack: f64,
}

/// Nearest non-empty block strictly below the anchor, aligned on either edge.
#[derive(Debug, Clone, Copy)]
pub struct Below {
    pub x_slack: f64,
}

/// Nearest numeric-looking block: same row first, then anywhere on the page.
#[derive(Debug, Clone, Copy)]
pub struct NearestNumeric {
    pub y_slack: f64,
    pub prefer_right: bool,
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// `min_by` keeps the earliest of equal elements, so remaining ties fall back
// to extraction order.
fn closest<'a, I>(candidates: I) -> Option<&'a TextBlock>
where
    I: Iterator<Item = ((f64, f64), &'a TextBlock)>,
{
    candidates
        .min_by(|(a, _), (b, _)| cmp_f64(a.0, b.0).then_with(|| cmp_f64(a.1, b.1)))
        .map(|(_, block)| block)
}

impl ValueLocator for RightOf {
    fn locate<'a>(&self, anchor: &BoundingBox, blocks: &'a [TextBlock]) -> Option<&'a TextBlock> {
        closest(
            blocks
                .iter()
                .filter(|b| {
                    b.bbox.row_distance(anchor) <= self.y_slack
                        && b.bbox.x0 > anchor.x1
                        && b.has_text()
                })
                .map(|b| ((b.bbox.row_distance(anchor), b.bbox.x0), b)),
        )
    }
}

impl ValueLocator for Below {
    fn locate<'a>(&self, anchor: &BoundingBox, blocks: &'a [TextBlock]) -> Option<&'a TextBlock> {
        closest(
            blocks
                .iter()
                .filter(|b| {
                    let same_column = (b.bbox.x0 - anchor.x0).abs() <= self.x_slack
                        || (b.bbox.x1 - anchor.x1).abs() <= self.x_slack;
                    b.bbox.y0 > anchor.y1 && same_column && b.has_text()
                })
                .map(|b| ((b.bbox.y0 - anchor.y1, 0.0), b)),
        )
    }
}

impl NearestNumeric {
    /// Same-row pass, optionally restricted to the right of the anchor.
    fn same_row<'a>(&self, anchor: &BoundingBox, numeric: &[&'a TextBlock]) -> Option<&'a TextBlock> {
        closest(
            numeric
                .iter()
                .copied()
                .filter(|b| {
                    b.bbox.row_distance(anchor) <= self.y_slack
                        && (!self.prefer_right || b.bbox.x0 >= anchor.x1)
                })
                .map(|b| ((b.bbox.row_distance(anchor), b.bbox.x0), b)),
        )
    }

    /// Unconstrained pass over every numeric-looking block.
    fn anywhere<'a>(&self, anchor: &BoundingBox, numeric: &[&'a TextBlock]) -> Option<&'a TextBlock> {
        closest(
            numeric
                .iter()
                .copied()
                .map(|b| ((b.bbox.corner_distance(anchor), b.bbox.x0), b)),
        )
    }
}

impl ValueLocator for NearestNumeric {
    fn locate<'a>(&self, anchor: &BoundingBox, blocks: &'a [TextBlock]) -> Option<&'a TextBlock> {
        let numeric: Vec<&TextBlock> = blocks.iter().filter(|b| is_numeric_like(&b.text)).collect();

        self.same_row(anchor, &numeric)
            .or_else(|| self.anywhere(anchor, &numeric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(x0: f64, y0: f64, x1: f64, y1: f64, text: &str) -> TextBlock {
        TextBlock::new(BoundingBox::new(x0, y0, x1, y1), text)
    }

    #[test]
    fn test_right_same_row() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(160.0, 102.0, 200.0, 112.0, "$1,234"),
            block(160.0, 300.0, 200.0, 310.0, "$9,999"),
        ];

        let found = RightOf { y_slack: 60.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "$1,234");
    }

    #[test]
    fn test_right_prefers_closest_row_then_leftmost() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(400.0, 100.0, 450.0, 110.0, "far"),
            block(170.0, 120.0, 200.0, 130.0, "lower"),
            block(300.0, 100.0, 350.0, 110.0, "near"),
        ];

        let found = RightOf { y_slack: 60.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "near");
    }

    #[test]
    fn test_right_rejects_touching_blank_and_left() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(150.0, 100.0, 170.0, 110.0, "touching"),
            block(160.0, 100.0, 170.0, 110.0, "   \n"),
            block(10.0, 100.0, 90.0, 110.0, "left"),
        ];

        assert!(RightOf { y_slack: 60.0 }.locate(&anchor, &blocks).is_none());
    }

    #[test]
    fn test_right_ties_keep_input_order() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(200.0, 100.0, 250.0, 110.0, "first"),
            block(200.0, 100.0, 260.0, 115.0, "second"),
        ];

        let found = RightOf { y_slack: 5.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "first");
    }

    #[test]
    fn test_below_column_alignment() {
        let anchor = BoundingBox::new(100.0, 100.0, 200.0, 110.0);
        let blocks = vec![
            block(100.0, 120.0, 200.0, 130.0, "42"),
            block(400.0, 120.0, 500.0, 130.0, "99"),
        ];

        let found = Below { x_slack: 40.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "42");
    }

    #[test]
    fn test_below_right_edge_alignment_and_nearest_row() {
        let anchor = BoundingBox::new(100.0, 100.0, 200.0, 110.0);
        let blocks = vec![
            block(150.0, 200.0, 210.0, 210.0, "farther"),
            block(170.0, 140.0, 205.0, 150.0, "nearer"),
            block(100.0, 105.0, 200.0, 115.0, "overlapping"),
        ];

        let found = Below { x_slack: 40.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "nearer");
    }

    #[test]
    fn test_nearest_numeric_same_row() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(100.0, 100.0, 150.0, 110.0, "Line 11"),
            block(160.0, 100.0, 180.0, 110.0, "see instructions"),
            block(400.0, 101.0, 450.0, 111.0, "52,300."),
            block(50.0, 100.0, 90.0, 110.0, "11"),
        ];

        let locator = NearestNumeric { y_slack: 60.0, prefer_right: true };
        assert_eq!(locator.locate(&anchor, &blocks).unwrap().text, "52,300.");

        // Without the right-side restriction the left block and the anchor
        // itself qualify; both sit at row distance 0, leftmost wins.
        let locator = NearestNumeric { y_slack: 60.0, prefer_right: false };
        assert_eq!(locator.locate(&anchor, &blocks).unwrap().text, "11");
    }

    #[test]
    fn test_nearest_numeric_fallback() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(100.0, 100.0, 150.0, 110.0, "Total tax"),
            block(160.0, 100.0, 300.0, 110.0, "Section"),
            block(500.0, 400.0, 550.0, 410.0, "7,000"),
            block(120.0, 250.0, 170.0, 260.0, "3,500"),
        ];

        let locator = NearestNumeric { y_slack: 60.0, prefer_right: true };
        assert_eq!(locator.locate(&anchor, &blocks).unwrap().text, "3,500");
    }

    #[test]
    fn test_nearest_numeric_none() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![block(100.0, 100.0, 150.0, 110.0, "Total tax")];

        let locator = NearestNumeric { y_slack: 60.0, prefer_right: true };
        assert!(locator.locate(&anchor, &blocks).is_none());
    }

    #[test]
    fn test_nearest_numeric_same_row_includes_touching() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        let blocks = vec![
            block(150.0, 100.0, 190.0, 110.0, "1,000"),
            block(300.0, 100.0, 350.0, 110.0, "2,000"),
        ];

        let locator = NearestNumeric { y_slack: 60.0, prefer_right: true };
        assert_eq!(locator.locate(&anchor, &blocks).unwrap().text, "1,000");

        // `right` is strict: the touching block does not qualify.
        let found = RightOf { y_slack: 60.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "2,000");
    }

    #[test]
    fn test_below_is_strict() {
        let anchor = BoundingBox::new(100.0, 100.0, 200.0, 110.0);
        let blocks = vec![block(100.0, 110.0, 200.0, 120.0, "touching")];

        assert!(Below { x_slack: 40.0 }.locate(&anchor, &blocks).is_none());
    }

    #[test]
    fn test_nearest_numeric_fallback_ties_prefer_leftmost() {
        let anchor = BoundingBox::new(100.0, 100.0, 150.0, 110.0);
        // Both sit at corner distance 200, off the anchor's row band.
        let blocks = vec![
            block(150.0, 250.0, 190.0, 260.0, "300"),
            block(50.0, 250.0, 90.0, 260.0, "400"),
        ];

        let locator = NearestNumeric { y_slack: 60.0, prefer_right: true };
        assert_eq!(locator.locate(&anchor, &blocks).unwrap().text, "400");
    }

    #[test]
    fn test_below_ties_keep_input_order() {
        let anchor = BoundingBox::new(100.0, 100.0, 200.0, 110.0);
        let blocks = vec![
            block(110.0, 130.0, 150.0, 140.0, "first"),
            block(90.0, 130.0, 210.0, 140.0, "second"),
        ];

        let found = Below { x_slack: 40.0 }.locate(&anchor, &blocks).unwrap();
        assert_eq!(found.text, "first");
    }
}

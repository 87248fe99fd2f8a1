//! Anchor label matching.

use crate::models::block::TextBlock;

/// Case-insensitive substring matcher for one label.
#[derive(Debug, Clone)]
pub struct AnchorMatcher {
    folded: String,
}

impl AnchorMatcher {
    pub fn new(label: &str) -> Self {
        Self {
            folded: label.to_lowercase(),
        }
    }

    /// Whether the block's text contains the label.
    pub fn matches(&self, block: &TextBlock) -> bool {
        block.text.to_lowercase().contains(&self.folded)
    }

    /// First block, in input order, containing the label.
    pub fn find<'a>(&self, blocks: &'a [TextBlock]) -> Option<&'a TextBlock> {
        blocks.iter().find(|b| self.matches(b))
    }

    /// Every block containing the label, in input order.
    pub fn find_all<'a>(&self, blocks: &'a [TextBlock]) -> Vec<&'a TextBlock> {
        blocks.iter().filter(|b| self.matches(b)).collect()
    }
}

/// Locate the anchor block for `label`.
///
/// Only the first match counts; a label that recurs on the page resolves to
/// its earliest occurrence in extraction order.
pub fn find_anchor<'a>(blocks: &'a [TextBlock], label: &str) -> Option<&'a TextBlock> {
    AnchorMatcher::new(label).find(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::BoundingBox;
    use pretty_assertions::assert_eq;

    fn block(x0: f64, y0: f64, text: &str) -> TextBlock {
        TextBlock::new(BoundingBox::new(x0, y0, x0 + 50.0, y0 + 10.0), text)
    }

    #[test]
    fn test_first_match_wins() {
        let blocks = vec![
            block(0.0, 0.0, "Form 1040"),
            block(0.0, 100.0, "1a Total amount from Form(s) W-2"),
            block(0.0, 300.0, "Copy: total AMOUNT from form(s) w-2"),
        ];

        let anchor = find_anchor(&blocks, "Total amount from Form(s) W-2").unwrap();
        assert_eq!(anchor.bbox.y0, 100.0);

        let all = AnchorMatcher::new("total amount").find_all(&blocks);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_multiline_and_case() {
        let blocks = vec![block(0.0, 0.0, "Adjusted Gross\nIncome line 11\n")];
        assert!(find_anchor(&blocks, "income LINE 11").is_some());
        assert!(find_anchor(&blocks, "gross income").is_none());
    }

    #[test]
    fn test_no_anchor() {
        let blocks = vec![block(0.0, 0.0, "Schedule B")];
        assert!(find_anchor(&blocks, "Wages").is_none());
        assert!(find_anchor(&[], "Wages").is_none());
    }
}

//! Common regex patterns for tax-form values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Digit run optionally mixed with separators. Deliberately loose: also
    // matches dates, version numbers and form names such as "W-2".
    pub static ref NUMERIC_LIKE: Regex = Regex::new(
        r"[0-9][0-9,.]*"
    ).unwrap();

    // Currency symbols, thousands separators and whitespace around amounts
    pub static ref AMOUNT_NOISE: Regex = Regex::new(
        r"[\s$,\u{00a0}]"
    ).unwrap();

    // Accounting-style negative: (1,234.00)
    pub static ref PARENTHESIZED: Regex = Regex::new(
        r"^\((.*)\)$"
    ).unwrap();

    // Anchor file names: <prefix>_<year>.json
    pub static ref ANCHOR_FILE: Regex = Regex::new(
        r"^(?P<prefix>.+)_(?P<year>[^_]+)\.json$"
    ).unwrap();
}

/// Whether the text contains a numeric-looking run.
pub fn is_numeric_like(text: &str) -> bool {
    NUMERIC_LIKE.is_match(text)
}

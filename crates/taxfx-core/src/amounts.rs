//! Amount sanitization for front ends.
//!
//! The extractor stores values exactly as printed on the form. Callers that
//! want numbers apply these helpers to the finished result.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::patterns::{AMOUNT_NOISE, PARENTHESIZED};

/// Parse a printed amount such as `$1,234.56` or `(300)`.
///
/// Returns `None` when the cleaned text is not a plain decimal number.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let (body, negative) = match PARENTHESIZED.captures(trimmed) {
        Some(caps) => (caps.get(1).map_or("", |m| m.as_str()), true),
        None => (trimmed, false),
    };

    let cleaned = AMOUNT_NOISE.replace_all(body, "");
    // Forms often print a trailing period after whole-dollar amounts.
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// Replace every string field value that parses as an amount with a JSON
/// number; other values are left untouched. `_meta` and `_evidence` are
/// skipped.
pub fn coerce_values(result: &mut serde_json::Value) {
    let Some(map) = result.as_object_mut() else {
        return;
    };

    for (key, value) in map.iter_mut() {
        if key.starts_with('_') {
            continue;
        }
        let Some(text) = value.as_str() else {
            continue;
        };
        if let Some(amount) = parse_amount(text) {
            if let Ok(number) = serde_json::from_str::<serde_json::Number>(&amount.normalize().to_string()) {
                *value = serde_json::Value::Number(number);
            }
        }
    }
}

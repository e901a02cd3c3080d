//! Low-level string parsing for catalogue display values.
//!
//! Feeds carry prices and sizes the way catalogues print them: `"$5.50"`,
//! `"2 for $9"`, `"500 G"`, `"1/2 Price"`. These helpers use manual string
//! scanning rather than `regex` to stay dependency-light. See
//! [`crate::import`] for how they compose into full item normalization.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Units recognized at the end of a size token, longest-match first so
/// `"kg"` wins over `"g"` and `"pack"` over `"pk"`.
const SIZE_UNITS: &[&str] = &["pack", "kg", "ml", "pk", "g", "l", "ea", "each"];

/// Parses a catalogue price display string into a per-item decimal price.
///
/// Accepted shapes (case-insensitive):
/// - `"$5.50"`, `"5.50"`, `"$1,234.00"` — plain prices;
/// - `"2 for $9"` / `"2 For $9.00"` — multibuy, divided down to per-item;
/// - trailing noise like `"ea"`, `"each"` is ignored.
///
/// Returns `None` for anything that does not contain a parseable amount,
/// including zero and negative amounts.
#[must_use]
pub fn parse_price(display: &str) -> Option<Decimal> {
    let lower = display.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let amount = first_amount(&lower)?;

    // Multibuy: a leading count before "for", e.g. "2 for $9".
    let per_item = match multibuy_count(&lower) {
        Some(count) if count > 1 => amount / Decimal::from(count),
        _ => amount,
    };

    if per_item <= Decimal::ZERO {
        return None;
    }

    Some(per_item.round_dp(2))
}

/// Derives the whole-percent discount from a was/now pair.
///
/// Returns `None` unless both prices are positive and the current price is
/// actually lower.
#[must_use]
pub fn discount_percent(price: Decimal, was_price: Decimal) -> Option<i32> {
    if price <= Decimal::ZERO || was_price <= price {
        return None;
    }

    let percent = (was_price - price) / was_price * Decimal::from(100);
    percent.round().to_i32()
}

/// Canonicalizes a display size: `"500 G"` becomes `"500g"`, `"2 L"`
/// becomes `"2l"`, `"10 Pack"` becomes `"10pack"`.
///
/// Sizes that don't look like a number-plus-unit are lowercased and
/// whitespace-collapsed but otherwise left alone, so odd formats still
/// compare equal to themselves.
#[must_use]
pub fn canonical_size(display: &str) -> Option<String> {
    let collapsed = display
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.is_empty() {
        return None;
    }

    // "number unit" or "numberunit" with a known unit → join them.
    let compact: String = collapsed.chars().filter(|c| *c != ' ').collect();
    for unit in SIZE_UNITS {
        if let Some(number) = compact.strip_suffix(unit) {
            if !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit() || c == '.')
                && number.chars().any(|c| c.is_ascii_digit())
            {
                return Some(format!("{number}{unit}"));
            }
        }
    }

    Some(collapsed)
}

/// Collapses whitespace and strips catalogue framing characters from a
/// product name.
#[must_use]
pub fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == '|' || c == '*' || c == ' ')
        .to_string()
}

// ---------------------------------------------------------------------------
// Internal parsing helpers
// ---------------------------------------------------------------------------

/// Finds the first dollar amount in `s`: digits with optional thousands
/// commas and an optional decimal part. Input must be pre-lowercased.
fn first_amount(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut i = 0;

    // Prefer the amount after a '$' when one exists; "2 for $9" must not
    // parse as 2.
    if let Some(dollar) = s.find('$') {
        i = dollar + 1;
    }

    while i < bytes.len() && !bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let start = i;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b',' ) {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }

    let raw: String = s[start..i].chars().filter(|c| *c != ',').collect();
    raw.parse::<Decimal>().ok()
}

/// Returns the leading count for "N for $X" shapes. Input must be
/// pre-lowercased.
fn multibuy_count(s: &str) -> Option<u32> {
    let for_pos = s.find(" for ")?;
    let head = s[..for_pos].trim();

    if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    head.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn parse_price_plain_dollar() {
        assert_eq!(parse_price("$5.50"), Some(dec("5.50")));
    }

    #[test]
    fn parse_price_bare_number() {
        assert_eq!(parse_price("4.20"), Some(dec("4.20")));
    }

    #[test]
    fn parse_price_with_thousands_comma() {
        assert_eq!(parse_price("$1,234.00"), Some(dec("1234.00")));
    }

    #[test]
    fn parse_price_multibuy_divides() {
        assert_eq!(parse_price("2 for $9"), Some(dec("4.50")));
        assert_eq!(parse_price("3 For $10.00"), Some(dec("3.33")));
    }

    #[test]
    fn parse_price_multibuy_needs_dollar_amount() {
        // Must not read the count as the price.
        assert_eq!(parse_price("2 for $9"), Some(dec("4.50")));
    }

    #[test]
    fn parse_price_trailing_each_ignored() {
        assert_eq!(parse_price("$3.00 ea"), Some(dec("3.00")));
    }

    #[test]
    fn parse_price_rejects_garbage() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("half price"), None);
        assert_eq!(parse_price("$0.00"), None);
    }

    #[test]
    fn discount_percent_half_price() {
        assert_eq!(discount_percent(dec("2.75"), dec("5.50")), Some(50));
    }

    #[test]
    fn discount_percent_rounds() {
        assert_eq!(discount_percent(dec("2.00"), dec("2.99")), Some(33));
    }

    #[test]
    fn discount_percent_none_when_not_cheaper() {
        assert_eq!(discount_percent(dec("5.50"), dec("5.50")), None);
        assert_eq!(discount_percent(dec("6.00"), dec("5.50")), None);
    }

    #[test]
    fn canonical_size_joins_number_and_unit() {
        assert_eq!(canonical_size("500 G"), Some("500g".to_string()));
        assert_eq!(canonical_size("2 L"), Some("2l".to_string()));
        assert_eq!(canonical_size("10 Pack"), Some("10pack".to_string()));
    }

    #[test]
    fn canonical_size_passes_odd_formats_through() {
        assert_eq!(canonical_size("Dozen"), Some("dozen".to_string()));
        assert_eq!(canonical_size("4 x 250ml"), Some("4 x 250ml".to_string()));
    }

    #[test]
    fn canonical_size_empty_is_none() {
        assert_eq!(canonical_size("   "), None);
    }

    #[test]
    fn clean_name_collapses_whitespace_and_framing() {
        assert_eq!(clean_name("  Tim  Tam   Original 200g * "), "Tim Tam Original 200g");
    }
}

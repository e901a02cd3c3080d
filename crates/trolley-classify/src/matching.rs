//! Cross-brand product-type matching.
//!
//! Comparing "Dairy Farmers Full Cream Milk 2L" against "Pauls Full Cream
//! Milk 2L" means stripping the brand, normalizing naming variants, and
//! judging token overlap. Two flavours exist: the catalog path
//! ([`types_match`]) where candidates are already size-filtered, and the
//! specials path ([`is_similar_type`]) which is looser because catalogue
//! names are messier.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Multiword naming variants folded to a single token before comparison.
const TYPE_REPLACEMENTS: &[(&str, &str)] = &[
    ("full cream", "fullcream"),
    ("full-cream", "fullcream"),
    ("semi skim", "semi-skim"),
    ("semi-skimmed", "semi-skim"),
    ("skim milk", "skimmilk"),
    ("low fat", "lowfat"),
    ("low-fat", "lowfat"),
    ("no added", "noadded"),
    ("free range", "freerange"),
    ("extra virgin", "extravirgin"),
];

/// Unit tokens dropped before token-overlap comparison; sizes are compared
/// through the structured size field instead.
const UNIT_TOKENS: &[&str] = &["ml", "l", "g", "kg", "pk", "pack", "x", "ea", "each"];

/// Filler words carrying no product-type signal, including store names.
const FILLER_WORDS: &[&str] = &[
    "the",
    "a",
    "an",
    "and",
    "or",
    "of",
    "with",
    "in",
    "on",
    "fresh",
    "australian",
    "coles",
    "woolworths",
    "aldi",
    "iga",
];

static EDGE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s\-,]+|[\s\-,]+$").unwrap_or_else(|e| panic!("invalid punctuation pattern: {e}"))
});

static TRAILING_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\d+\s*(g|kg|ml|l|pk|pack|each)\s*$")
        .unwrap_or_else(|e| panic!("invalid size pattern: {e}"))
});

/// Extract a product type from a product name by removing the brand prefix.
///
/// `("Dairy Farmers Full Cream Milk 2L", Some("Dairy Farmers"))` becomes
/// `"Full Cream Milk 2L"`. Falls back to the full name when stripping would
/// leave nothing.
#[must_use]
pub fn extract_product_type(name: &str, brand: Option<&str>) -> String {
    let Some(brand) = brand.filter(|b| !b.is_empty()) else {
        return name.to_string();
    };
    if name.is_empty() {
        return String::new();
    }

    let prefix = Regex::new(&format!(r"(?i)^{}\s*", regex::escape(brand)));
    let stripped = match prefix {
        Ok(re) => re.replace(name, "").trim().to_string(),
        // An unparseable brand means no stripping, not a failure.
        Err(_) => name.to_string(),
    };

    let cleaned = EDGE_PUNCTUATION.replace_all(&stripped, "").to_string();

    if cleaned.is_empty() {
        name.to_string()
    } else {
        cleaned
    }
}

/// Extract a product type from a specials name: removes the brand wherever
/// it occurs (catalogue names repeat brands mid-string) and strips the
/// trailing size token.
#[must_use]
pub fn extract_special_type(name: &str, brand: Option<&str>) -> String {
    let mut product_type = name.to_string();

    if let Some(brand) = brand.filter(|b| !b.is_empty()) {
        if let Ok(re) = Regex::new(&format!(r"(?i){}", regex::escape(brand))) {
            let stripped = re.replace_all(&product_type, "").trim().to_string();
            if !stripped.is_empty() {
                product_type = stripped;
            }
        }
    }

    strip_type_suffix(&product_type)
}

/// Remove a trailing size token ("180g", "2L", "10 pack") and tidy
/// whitespace/punctuation edges.
#[must_use]
pub fn strip_type_suffix(product_type: &str) -> String {
    let without_size = TRAILING_SIZE.replace(product_type, "").to_string();
    let collapsed = without_size.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == '|' || c == ' ' || c == '-')
        .to_string()
}

/// Normalize a product type for comparison: lowercase, fold known naming
/// variants, collapse whitespace.
#[must_use]
pub fn normalize_product_type(product_type: &str) -> String {
    if product_type.is_empty() {
        return String::new();
    }

    let mut normalized = product_type.to_lowercase();
    for (from, to) in TYPE_REPLACEMENTS {
        normalized = normalized.replace(from, to);
    }

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether two normalized product types describe the same product.
///
/// Token sets are compared after unit tokens and bare numbers are dropped;
/// at least 80 % of the smaller set must overlap. Handles word-order
/// differences ("Butter Salted" vs "Salted Butter").
#[must_use]
pub fn types_match(type1: &str, type2: &str) -> bool {
    if type1.is_empty() || type2.is_empty() {
        return false;
    }

    let significant = |s: &str| -> HashSet<String> {
        s.split_whitespace()
            .filter(|w| !UNIT_TOKENS.contains(w))
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .map(ToString::to_string)
            .collect()
    };

    let words1 = significant(type1);
    let words2 = significant(type2);

    if words1.is_empty() || words2.is_empty() {
        return false;
    }

    let overlap = words1.intersection(&words2).count();
    let min_len = words1.len().min(words2.len());

    #[allow(clippy::cast_precision_loss)]
    {
        overlap as f64 / min_len as f64 >= 0.8
    }
}

/// Fold common plural forms: `"mangoes"` → `"mango"`, `"cherries"` →
/// `"cherry"`, `"peaches"` → `"peach"`, `"apples"` → `"apple"`.
fn normalize_plural(s: &str) -> String {
    if let Some(stem) = s.strip_suffix("oes") {
        return format!("{stem}o");
    }
    if let Some(stem) = s.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = s.strip_suffix("es") {
        return stem.to_string();
    }
    if let Some(stem) = s.strip_suffix('s') {
        return stem.to_string();
    }
    s.to_string()
}

/// Looser similarity for specials names: exact and plural-normalized
/// equality, containment for non-trivial lengths, then word overlap with
/// filler words removed.
#[must_use]
pub fn is_similar_type(type1: &str, type2: &str) -> bool {
    let t1 = type1.to_lowercase().trim().to_string();
    let t2 = type2.to_lowercase().trim().to_string();

    if t1.is_empty() || t2.is_empty() {
        return false;
    }

    if t1 == t2 {
        return true;
    }

    let t1_norm = normalize_plural(&t1);
    let t2_norm = normalize_plural(&t2);

    if t1_norm == t2_norm {
        return true;
    }

    // Containment, but only for meaningful lengths so "es" can't match
    // everything.
    if t1.len() > 3 && t2.len() > 3 {
        if t1.contains(&t2) || t2.contains(&t1) {
            return true;
        }
        if t1_norm.contains(&t2_norm) || t2_norm.contains(&t1_norm) {
            return true;
        }
    }

    let significant = |s: &str| -> HashSet<String> {
        s.split_whitespace()
            .filter(|w| !FILLER_WORDS.contains(w))
            .map(normalize_plural)
            .collect()
    };

    let words1 = significant(&t1);
    let words2 = significant(&t2);

    if words1.is_empty() || words2.is_empty() {
        return false;
    }

    let overlap = words1.intersection(&words2).count();
    let min_words = words1.len().min(words2.len());

    if min_words <= 2 {
        // Produce names are one or two significant words; require a real hit.
        overlap >= 1
    } else {
        overlap * 2 >= min_words
    }
}

/// Pick the brand for a name by longest known-brand prefix match,
/// case-insensitive. Used when a catalogue line arrives without a brand.
#[must_use]
pub fn extract_brand(name: &str, known_brands: &[&str]) -> Option<String> {
    let lower = name.to_lowercase();

    let mut best: Option<&str> = None;
    for brand in known_brands {
        if brand.is_empty() {
            continue;
        }
        let brand_lower = brand.to_lowercase();
        let matches_prefix = lower.starts_with(&brand_lower)
            && lower[brand_lower.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        if matches_prefix && best.is_none_or(|b| brand.len() > b.len()) {
            best = Some(brand);
        }
    }

    best.map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_product_type_strips_brand_prefix() {
        assert_eq!(
            extract_product_type("Dairy Farmers Full Cream Milk 2L", Some("Dairy Farmers")),
            "Full Cream Milk 2L"
        );
    }

    #[test]
    fn extract_product_type_without_brand_is_identity() {
        assert_eq!(
            extract_product_type("Full Cream Milk 2L", None),
            "Full Cream Milk 2L"
        );
    }

    #[test]
    fn extract_product_type_is_case_insensitive() {
        assert_eq!(
            extract_product_type("PAULS Full Cream Milk 2L", Some("Pauls")),
            "Full Cream Milk 2L"
        );
    }

    #[test]
    fn extract_product_type_falls_back_when_brand_is_whole_name() {
        assert_eq!(extract_product_type("Vegemite", Some("Vegemite")), "Vegemite");
    }

    #[test]
    fn extract_product_type_cleans_leading_dash() {
        assert_eq!(
            extract_product_type("Bega - Tasty Cheese 500g", Some("Bega")),
            "Tasty Cheese 500g"
        );
    }

    #[test]
    fn extract_special_type_removes_brand_and_size() {
        assert_eq!(
            extract_special_type("Cadbury Dairy Milk 180g", Some("Cadbury")),
            "Dairy Milk"
        );
    }

    #[test]
    fn strip_type_suffix_removes_trailing_pack() {
        assert_eq!(strip_type_suffix("Bread Rolls 6 pack"), "Bread Rolls");
    }

    #[test]
    fn normalize_product_type_folds_variants() {
        assert_eq!(
            normalize_product_type("Full Cream  Milk 2L"),
            "fullcream milk 2l"
        );
        assert_eq!(
            normalize_product_type("Free Range Eggs"),
            "freerange eggs"
        );
    }

    #[test]
    fn types_match_ignores_word_order() {
        assert!(types_match(
            &normalize_product_type("Butter Salted 500g"),
            &normalize_product_type("Salted Butter 500g")
        ));
    }

    #[test]
    fn types_match_ignores_unit_tokens() {
        assert!(types_match("fullcream milk 2 l", "fullcream milk"));
    }

    #[test]
    fn types_match_rejects_different_products() {
        assert!(!types_match("fullcream milk", "greek yoghurt"));
    }

    #[test]
    fn types_match_rejects_empty() {
        assert!(!types_match("", "milk"));
    }

    #[test]
    fn is_similar_type_plural_normalization() {
        assert!(is_similar_type("Mangoes", "Mango"));
        assert!(is_similar_type("Cherries", "Cherry"));
        assert!(is_similar_type("Peaches", "Peach"));
    }

    #[test]
    fn is_similar_type_containment() {
        assert!(is_similar_type("Full Cream Milk", "Milk"));
    }

    #[test]
    fn is_similar_type_filler_words_ignored() {
        assert!(is_similar_type("Australian Bananas", "Fresh Banana"));
    }

    #[test]
    fn is_similar_type_rejects_unrelated() {
        assert!(!is_similar_type("Laundry Powder", "Strawberries"));
    }

    #[test]
    fn is_similar_type_rejects_empty() {
        assert!(!is_similar_type("", "milk"));
    }

    #[test]
    fn extract_brand_prefers_longest_prefix() {
        let brands = ["Coca-Cola", "Coca-Cola Zero"];
        assert_eq!(
            extract_brand("Coca-Cola Zero Sugar 1.25L", &brands),
            Some("Coca-Cola Zero".to_string())
        );
    }

    #[test]
    fn extract_brand_requires_word_boundary() {
        let brands = ["Pauls"];
        assert_eq!(extract_brand("Paulsen Estate Wine", &brands), None);
    }

    #[test]
    fn extract_brand_none_when_no_prefix_matches() {
        let brands = ["Cadbury", "Nestle"];
        assert_eq!(extract_brand("Home Brand Sugar 1kg", &brands), None);
    }
}

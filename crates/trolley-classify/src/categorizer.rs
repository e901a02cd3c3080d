//! Priority-scored categorization of product names.
//!
//! Matching is two-pass: the full lowercased text (name plus brand) first,
//! then the text with descriptor phrases stripped, so that "Tuna in Tomato
//! Sauce" is judged as tuna rather than as sauce. Leaf rules are consulted
//! before parent rules; the highest-scoring category wins.

use std::collections::HashMap;

use crate::rules::{self, RuleSet};

/// Strip descriptor phrases from a product name, returning the lowercased
/// primary product text.
///
/// `"Tuna In Springwater 95g"` becomes `"tuna"`; `"Maggi Chicken Flavoured
/// Noodles"` becomes `"maggi noodles"`.
#[must_use]
pub fn extract_primary_product(name: &str) -> String {
    let mut text = name.to_lowercase();
    for pattern in rules::descriptor_patterns() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

/// Score one rule set against pre-lowercased text.
///
/// Any exclusion hit vetoes the category. Keyword matches score
/// `100 + keyword length` (longer matches are more specific); pattern
/// matches score a flat 50. A nonzero score gains the category's priority
/// weight so specific product types beat descriptor-prone categories.
fn match_score(text: &str, rule_set: &RuleSet) -> i32 {
    if rule_set.exclude.iter().any(|excl| text.contains(excl)) {
        return 0;
    }

    let mut score = 0i32;

    for keyword in rule_set.keywords {
        if text.contains(keyword) {
            score = score.max(100 + i32::try_from(keyword.len()).unwrap_or(0));
        }
    }

    for pattern in &rule_set.patterns {
        if pattern.is_match(text) {
            score = score.max(50);
        }
    }

    if score > 0 {
        score += rule_set.priority;
    }

    score
}

/// Best-scoring slug across a rule table, trying the primary-product text
/// for any category the full text fails to match. First definition wins ties.
fn best_match(
    rule_sets: &'static [RuleSet],
    text: &str,
    primary_text: &str,
) -> Option<&'static str> {
    let mut best: Option<(&'static str, i32)> = None;

    for rule_set in rule_sets {
        let mut score = match_score(text, rule_set);
        if score == 0 {
            score = match_score(primary_text, rule_set);
        }
        if score > 0 && best.is_none_or(|(_, b)| score > b) {
            best = Some((rule_set.slug, score));
        }
    }

    best.map(|(slug, _)| slug)
}

/// Categorize a product from its name and optional brand.
///
/// Returns the winning category slug — a leaf subcategory when one matches,
/// otherwise a parent department — or `None` when nothing matches.
#[must_use]
pub fn categorize(name: &str, brand: Option<&str>) -> Option<&'static str> {
    if name.is_empty() {
        return None;
    }

    let combined = match brand {
        Some(b) => format!("{name} {b}"),
        None => name.to_string(),
    };
    let text = combined.to_lowercase();
    let primary_text = extract_primary_product(&combined);

    best_match(rules::leaf_rules(), &text, &primary_text)
        .or_else(|| best_match(rules::parent_rules(), &text, &primary_text))
}

/// Categorize a batch of `(id, name, brand)` items.
///
/// Items that fail to categorize are absent from the result map.
#[must_use]
pub fn categorize_batch(items: &[(i64, String, Option<String>)]) -> HashMap<i64, &'static str> {
    let mut results = HashMap::new();
    for (id, name, brand) in items {
        if let Some(slug) = categorize(name, brand.as_deref()) {
            results.insert(*id, slug);
        }
    }
    results
}

/// All parent categories whose rules hit the text at all, ordered by number
/// of matching keywords/patterns. Exclusions are ignored — this is the
/// widest net, intended for manual review.
#[must_use]
pub fn suggestions(name: &str, brand: Option<&str>) -> Vec<&'static str> {
    if name.is_empty() {
        return Vec::new();
    }

    let text = match brand {
        Some(b) => format!("{name} {b}").to_lowercase(),
        None => name.to_lowercase(),
    };

    let mut matches: Vec<(&'static str, usize)> = Vec::new();
    for rule_set in rules::parent_rules() {
        let keyword_hits = rule_set.keywords.iter().filter(|k| text.contains(*k)).count();
        let pattern_hits = rule_set.patterns.iter().filter(|p| p.is_match(&text)).count();
        let hits = keyword_hits + pattern_hits;
        if hits > 0 {
            matches.push((rule_set.slug, hits));
        }
    }

    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches.into_iter().map(|(slug, _)| slug).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_returns_none() {
        assert_eq!(categorize("", None), None);
    }

    #[test]
    fn unmatched_name_returns_none() {
        assert_eq!(categorize("Mystery Item", None), None);
    }

    #[test]
    fn tuna_in_sauce_is_canned_food_not_sauce() {
        assert_eq!(
            categorize("John West Tuna In Tomato And Onion Savoury Sauce 95g", None),
            Some("canned-food")
        );
    }

    #[test]
    fn tomato_sauce_is_sauce() {
        assert_eq!(
            categorize("Heinz Tomato Sauce 500ml", None),
            Some("sauces-condiments")
        );
    }

    #[test]
    fn bbq_shapes_are_biscuits_not_bbq_meat() {
        assert_eq!(
            categorize("Arnott's Shapes BBQ 175g", None),
            Some("biscuits")
        );
    }

    #[test]
    fn hot_dog_rolls_are_bakery_not_meat() {
        assert_eq!(
            categorize("Hot Dog Rolls 6 Pack", None),
            Some("bread-rolls-wraps")
        );
    }

    #[test]
    fn full_cream_milk_is_milk() {
        assert_eq!(
            categorize("Pauls Full Cream Milk 2L", None),
            Some("milk")
        );
    }

    #[test]
    fn brand_participates_in_matching() {
        // Name alone is ambiguous; the brand carries the signal.
        assert_eq!(
            categorize("Dairy Milk Block 180g", Some("Cadbury")),
            Some("chocolate")
        );
    }

    #[test]
    fn cat_food_beats_canned_food() {
        assert_eq!(
            categorize("Whiskas Wet Cat Food 400g", None),
            Some("cat-food")
        );
    }

    #[test]
    fn licensed_frozen_merchandise_is_not_freezer() {
        assert_eq!(
            categorize("Oral-B Disney Frozen Kids Toothbrush", None),
            Some("oral-care")
        );
    }

    #[test]
    fn soft_drink_brand_matches() {
        assert_eq!(
            categorize("Coca-Cola Classic Cans 24x375ml", None),
            Some("soft-drinks")
        );
    }

    #[test]
    fn descriptor_stripping_recovers_canned_match() {
        assert_eq!(
            categorize("Sirena Tuna With Corn 95g", None),
            Some("canned-food")
        );
    }

    #[test]
    fn extract_primary_product_strips_medium_and_size() {
        assert_eq!(extract_primary_product("Tuna In Springwater 95g"), "tuna");
    }

    #[test]
    fn extract_primary_product_strips_flavour_descriptor() {
        assert_eq!(
            extract_primary_product("Maggi Chicken Flavoured Noodles"),
            "maggi noodles"
        );
    }

    #[test]
    fn extract_primary_product_keeps_plain_names() {
        assert_eq!(
            extract_primary_product("Cadbury Dairy Milk"),
            "cadbury dairy milk"
        );
    }

    #[test]
    fn batch_skips_uncategorizable_items() {
        let items = vec![
            (1i64, "Tim Tam Original 200g".to_string(), None),
            (2i64, "Completely Unknowable Widget".to_string(), None),
        ];
        let result = categorize_batch(&items);
        assert_eq!(result.get(&1), Some(&"biscuits"));
        assert!(!result.contains_key(&2));
    }

    #[test]
    fn suggestions_rank_by_hit_count() {
        let suggested = suggestions("Cadbury Chocolate Biscuit Snack", None);
        assert!(!suggested.is_empty());
        assert_eq!(suggested[0], "snacks-confectionery");
    }

    #[test]
    fn suggestions_empty_for_empty_name() {
        assert!(suggestions("", None).is_empty());
    }
}

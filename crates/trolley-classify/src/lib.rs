//! Product categorization and cross-brand product matching.
//!
//! Classifies free-text supermarket product names into a two-level category
//! taxonomy using hand-tuned keyword, pattern, and exclusion rules with
//! priority-weighted scoring, and matches products of the same type across
//! brands for price comparison. Pure string processing — no IO, no storage.

pub mod categorizer;
pub mod matching;
pub mod rules;
pub mod taxonomy;

pub use categorizer::{categorize, categorize_batch, extract_primary_product, suggestions};
pub use matching::{
    extract_brand, extract_product_type, extract_special_type, is_similar_type,
    normalize_product_type, strip_type_suffix, types_match,
};
pub use taxonomy::{parent_of, CategoryDef, LEAF_CATEGORIES, PARENT_CATEGORIES};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A batch of weekly specials for a single store, as handed off by an
/// upstream catalogue provider. This is the normalized wire format the
/// ingest pipeline consumes; site-specific extraction happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialsFeed {
    /// Slug of the store this batch belongs to (e.g. `"woolworths"`).
    pub store: String,
    /// Identifier of the upstream provider (e.g. `"salefinder"`).
    pub provider: String,
    pub fetched_at: DateTime<Utc>,
    /// First day the catalogue prices apply.
    pub valid_from: Option<NaiveDate>,
    /// Last day the catalogue prices apply.
    pub valid_to: Option<NaiveDate>,
    pub items: Vec<FeedItem>,
}

/// A single catalogue line as provided upstream. Prices arrive as display
/// strings (`"$5.50"`, `"2 for $9"`); parsing them is the ingest layer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub name: String,
    pub brand: Option<String>,
    /// Display size, e.g. `"500g"`, `"2L"`, `"10 Pack"`.
    pub size: Option<String>,
    /// Category string as labelled by the source, if any.
    pub category: Option<String>,
    pub price: String,
    pub was_price: Option<String>,
    /// Display unit price, e.g. `"$2.50 per 100g"`.
    pub unit_price: Option<String>,
    /// Store's internal product identifier (stockcode).
    pub store_product_code: Option<String>,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
}

/// A catalogue line after normalization: prices parsed, size canonicalized,
/// discount derived, validity window resolved. This is what gets persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedSpecial {
    pub name: String,
    pub brand: Option<String>,
    /// Canonical size token, e.g. `"500g"`.
    pub size: Option<String>,
    /// Category string as labelled by the source, kept for audit.
    pub raw_category: Option<String>,
    pub price: Decimal,
    pub was_price: Option<Decimal>,
    /// Whole-percent discount derived from `was_price`, when both are known.
    pub discount_percent: Option<i32>,
    /// Display unit price carried through verbatim, e.g. `"$2.50 per 100g"`.
    pub unit_price: Option<String>,
    pub store_product_code: Option<String>,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

impl SpecialsFeed {
    /// Returns the total number of catalogue lines in this batch.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the batch's validity window is known and `date`
    /// falls inside it. An open-ended window matches on the known side only.
    #[must_use]
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        let from_ok = self.valid_from.is_none_or(|d| d <= date);
        let to_ok = self.valid_to.is_none_or(|d| d >= date);
        from_ok && to_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(name: &str, price: &str) -> FeedItem {
        FeedItem {
            name: name.to_string(),
            brand: None,
            size: None,
            category: None,
            price: price.to_string(),
            was_price: None,
            unit_price: None,
            store_product_code: None,
            product_url: None,
            image_url: None,
        }
    }

    fn make_feed(items: Vec<FeedItem>) -> SpecialsFeed {
        SpecialsFeed {
            store: "woolworths".to_string(),
            provider: "salefinder".to_string(),
            fetched_at: Utc::now(),
            valid_from: NaiveDate::from_ymd_opt(2026, 3, 4),
            valid_to: NaiveDate::from_ymd_opt(2026, 3, 10),
            items,
        }
    }

    #[test]
    fn item_count_matches_items_len() {
        let feed = make_feed(vec![
            make_item("Cadbury Dairy Milk 180g", "$3.50"),
            make_item("Tim Tam Original 200g", "$2.75"),
        ]);
        assert_eq!(feed.item_count(), 2);
    }

    #[test]
    fn is_valid_on_inside_window() {
        let feed = make_feed(vec![]);
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert!(feed.is_valid_on(date));
    }

    #[test]
    fn is_valid_on_outside_window() {
        let feed = make_feed(vec![]);
        let date = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert!(!feed.is_valid_on(date));
    }

    #[test]
    fn is_valid_on_open_ended_window() {
        let mut feed = make_feed(vec![]);
        feed.valid_to = None;
        let date = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert!(feed.is_valid_on(date));
    }

    #[test]
    fn serde_roundtrip_feed() {
        let feed = make_feed(vec![make_item("Pauls Full Cream Milk 2L", "$4.20")]);
        let json = serde_json::to_string(&feed).expect("serialization failed");
        let decoded: SpecialsFeed = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded.store, feed.store);
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].name, "Pauls Full Cream Milk 2L");
    }
}

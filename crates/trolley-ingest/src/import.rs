//! The import pipeline: feed document in, database rows out.

use sqlx::PgPool;
use trolley_core::{FeedItem, NormalizedSpecial, SpecialsFeed};

use crate::normalize::{canonical_size, clean_name, discount_percent, parse_price};
use crate::IngestError;

/// Outcome of one feed import.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub store_slug: String,
    pub run_id: i64,
    pub items_found: usize,
    pub items_imported: usize,
    pub items_failed: usize,
    pub categorized: usize,
    pub prices_recorded: usize,
    pub notifications_fired: usize,
}

/// Imports one specials feed.
///
/// Item-level failures (unparseable price, empty name) are logged, counted,
/// and skipped — a bad catalogue line must not sink the batch. The run is
/// recorded in `ingest_runs` either way.
///
/// For lines that carry a store product code matching a catalog listing, a
/// price observation is appended and the product's alerts are evaluated.
///
/// # Errors
///
/// Returns [`IngestError::UnknownStore`] when the feed names a store that
/// has not been seeded, or [`IngestError::Db`] when the database fails
/// mid-batch (the ingest run is marked failed in that case when possible).
pub async fn import_feed(pool: &PgPool, feed: &SpecialsFeed) -> Result<ImportSummary, IngestError> {
    let store = match trolley_db::get_store_by_slug(pool, &feed.store).await {
        Ok(store) => store,
        Err(trolley_db::DbError::NotFound) => {
            return Err(IngestError::UnknownStore(feed.store.clone()));
        }
        Err(e) => return Err(e.into()),
    };

    let run_id = trolley_db::start_ingest_run(pool, store.id).await?;
    tracing::info!(store = %feed.store, run_id, items = feed.item_count(), "ingest: starting feed import");

    match import_items(pool, store.id, feed).await {
        Ok(counts) => {
            trolley_db::complete_ingest_run(
                pool,
                run_id,
                i32::try_from(counts.imported).unwrap_or(i32::MAX),
                i32::try_from(counts.failed).unwrap_or(i32::MAX),
            )
            .await?;

            tracing::info!(
                store = %feed.store,
                run_id,
                imported = counts.imported,
                failed = counts.failed,
                categorized = counts.categorized,
                notifications = counts.notifications,
                "ingest: feed import complete"
            );

            Ok(ImportSummary {
                store_slug: feed.store.clone(),
                run_id,
                items_found: feed.item_count(),
                items_imported: counts.imported,
                items_failed: counts.failed,
                categorized: counts.categorized,
                prices_recorded: counts.prices,
                notifications_fired: counts.notifications,
            })
        }
        Err(e) => {
            // Best effort; the original error is the one worth surfacing.
            if let Err(mark_err) =
                trolley_db::fail_ingest_run(pool, run_id, &e.to_string()).await
            {
                tracing::warn!(run_id, error = %mark_err, "ingest: failed to mark run failed");
            }
            Err(e)
        }
    }
}

struct ItemCounts {
    imported: usize,
    failed: usize,
    categorized: usize,
    prices: usize,
    notifications: usize,
}

async fn import_items(
    pool: &PgPool,
    store_id: i64,
    feed: &SpecialsFeed,
) -> Result<ItemCounts, IngestError> {
    let mut counts = ItemCounts {
        imported: 0,
        failed: 0,
        categorized: 0,
        prices: 0,
        notifications: 0,
    };

    for item in &feed.items {
        let special = match normalize_item(item, feed) {
            Ok(special) => special,
            Err(e) => {
                tracing::warn!(item = %item.name, error = %e, "ingest: skipping feed item");
                counts.failed += 1;
                continue;
            }
        };

        let category_id = resolve_category(pool, &special).await?;
        if category_id.is_some() {
            counts.categorized += 1;
        }

        let special_id = trolley_db::upsert_special(pool, store_id, category_id, &special).await?;

        if let Some((prices, notifications)) =
            record_catalog_price(pool, store_id, &special).await?
        {
            counts.prices += prices;
            counts.notifications += notifications;
        }

        tracing::debug!(special_id, item = %special.name, "ingest: item imported");
        counts.imported += 1;
    }

    Ok(counts)
}

/// Parses one feed line into a [`NormalizedSpecial`].
fn normalize_item(item: &FeedItem, feed: &SpecialsFeed) -> Result<NormalizedSpecial, IngestError> {
    let name = clean_name(&item.name);
    if name.is_empty() {
        return Err(IngestError::Item {
            name: item.name.clone(),
            reason: "empty name after cleanup".to_string(),
        });
    }

    let Some(price) = parse_price(&item.price) else {
        return Err(IngestError::Item {
            name: item.name.clone(),
            reason: format!("unparseable price \"{}\"", item.price),
        });
    };

    let was_price = item.was_price.as_deref().and_then(parse_price);
    let derived_discount = was_price.and_then(|was| discount_percent(price, was));

    Ok(NormalizedSpecial {
        name,
        brand: item.brand.clone().filter(|b| !b.trim().is_empty()),
        size: item.size.as_deref().and_then(canonical_size),
        raw_category: item.category.clone(),
        price,
        was_price,
        discount_percent: derived_discount,
        unit_price: item.unit_price.clone(),
        store_product_code: item.store_product_code.clone(),
        product_url: item.product_url.clone(),
        image_url: item.image_url.clone(),
        valid_from: feed.valid_from,
        valid_to: feed.valid_to,
    })
}

/// Auto-categorizes a special and resolves the slug against the taxonomy
/// table. The product name wins; the source's own category string is the
/// fallback signal for names the rules don't reach.
async fn resolve_category(
    pool: &PgPool,
    special: &NormalizedSpecial,
) -> Result<Option<i64>, IngestError> {
    let slug = trolley_classify::categorize(&special.name, special.brand.as_deref()).or_else(|| {
        special
            .raw_category
            .as_deref()
            .and_then(|raw| trolley_classify::categorize(raw, None))
    });

    let Some(slug) = slug else {
        return Ok(None);
    };

    match trolley_db::get_category_by_slug(pool, slug).await {
        Ok(category) => Ok(Some(category.id)),
        // A rules/taxonomy mismatch would land here; treat as uncategorized
        // rather than failing the batch.
        Err(trolley_db::DbError::NotFound) => {
            tracing::warn!(slug, "ingest: classifier slug missing from categories table");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// When the feed line maps to a known catalog listing, append a price
/// observation and evaluate alerts. Returns `(prices, notifications)`
/// recorded, or `None` when the line has no catalog counterpart.
async fn record_catalog_price(
    pool: &PgPool,
    store_id: i64,
    special: &NormalizedSpecial,
) -> Result<Option<(usize, usize)>, IngestError> {
    let Some(code) = special.store_product_code.as_deref() else {
        return Ok(None);
    };

    let Some(listing) = trolley_db::find_store_product_by_code(pool, store_id, code).await? else {
        return Ok(None);
    };

    let price_id = trolley_db::insert_price(
        pool,
        listing.id,
        special.price,
        None,
        special.was_price,
        true,
        "feed",
        special.valid_from,
        special.valid_to,
    )
    .await?;

    let fired = trolley_db::evaluate_alerts_for_price(
        pool,
        listing.product_id,
        price_id,
        special.price,
        true,
    )
    .await?;

    Ok(Some((1, fired)))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use trolley_core::FeedItem;

    use super::*;

    fn feed_with(items: Vec<FeedItem>) -> SpecialsFeed {
        SpecialsFeed {
            store: "woolworths".to_string(),
            provider: "salefinder".to_string(),
            fetched_at: Utc::now(),
            valid_from: NaiveDate::from_ymd_opt(2026, 3, 4),
            valid_to: NaiveDate::from_ymd_opt(2026, 3, 10),
            items,
        }
    }

    fn item(name: &str, price: &str) -> FeedItem {
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

    #[test]
    fn normalize_item_parses_prices_and_discount() {
        let mut feed_item = item("Tim Tam Original 200g", "$2.75");
        feed_item.was_price = Some("$5.50".to_string());
        feed_item.size = Some("200 G".to_string());
        let feed = feed_with(vec![]);

        let special = normalize_item(&feed_item, &feed).expect("normalize");
        assert_eq!(special.price, Decimal::new(275, 2));
        assert_eq!(special.was_price, Some(Decimal::new(550, 2)));
        assert_eq!(special.discount_percent, Some(50));
        assert_eq!(special.size.as_deref(), Some("200g"));
        assert_eq!(special.valid_to, NaiveDate::from_ymd_opt(2026, 3, 10));
    }

    #[test]
    fn normalize_item_rejects_unparseable_price() {
        let feed_item = item("Mystery Deal", "see in store");
        let feed = feed_with(vec![]);

        let result = normalize_item(&feed_item, &feed);
        assert!(matches!(result, Err(IngestError::Item { .. })));
    }

    #[test]
    fn normalize_item_rejects_empty_name() {
        let feed_item = item("  * ", "$2.00");
        let feed = feed_with(vec![]);

        let result = normalize_item(&feed_item, &feed);
        assert!(matches!(result, Err(IngestError::Item { .. })));
    }

    #[test]
    fn normalize_item_blank_brand_becomes_none() {
        let mut feed_item = item("Home Brand Sugar 1kg", "$1.50");
        feed_item.brand = Some("   ".to_string());
        let feed = feed_with(vec![]);

        let special = normalize_item(&feed_item, &feed).expect("normalize");
        assert!(special.brand.is_none());
    }
}

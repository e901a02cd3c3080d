//! Price-history queries for a product across stores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// One observation in a product's price history.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PricePointRow {
    pub recorded_at: DateTime<Utc>,
    pub price: Decimal,
    pub is_special: bool,
    pub store_name: String,
    pub store_slug: String,
}

/// Aggregates over a product's history window plus the current per-store
/// price spread.
#[derive(Debug, Clone)]
pub struct HistoryStats {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub current_min: Option<Decimal>,
    pub current_max: Option<Decimal>,
    pub price_points: i64,
    pub special_count: i64,
}

/// Price observations for a product since `since`, oldest first, optionally
/// restricted to one store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn price_history(
    pool: &PgPool,
    product_id: i64,
    since: DateTime<Utc>,
    store_id: Option<i64>,
) -> Result<Vec<PricePointRow>, DbError> {
    let rows = sqlx::query_as::<_, PricePointRow>(
        "SELECT p.recorded_at, p.price, p.is_special, s.name AS store_name, \
                s.slug AS store_slug \
         FROM prices p \
         JOIN store_products sp ON sp.id = p.store_product_id \
         JOIN stores s ON s.id = sp.store_id \
         WHERE sp.product_id = $1 \
           AND p.recorded_at >= $2 \
           AND ($3::BIGINT IS NULL OR sp.store_id = $3) \
         ORDER BY p.recorded_at, p.id",
    )
    .bind(product_id)
    .bind(since)
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Window aggregates plus the min/max of each store's current price.
///
/// The window half covers observations since `since`; the current spread is
/// computed over the latest observation per store regardless of window, so a
/// product that went quiet still reports its standing prices.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn price_history_stats(
    pool: &PgPool,
    product_id: i64,
    since: DateTime<Utc>,
) -> Result<HistoryStats, DbError> {
    let window: (Option<Decimal>, Option<Decimal>, Option<Decimal>, i64, i64) =
        sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>, Option<Decimal>, i64, i64)>(
            "SELECT MIN(p.price), MAX(p.price), AVG(p.price)::numeric(10,2), \
                    COUNT(*), COUNT(*) FILTER (WHERE p.is_special) \
             FROM prices p \
             JOIN store_products sp ON sp.id = p.store_product_id \
             WHERE sp.product_id = $1 \
               AND p.recorded_at >= $2",
        )
        .bind(product_id)
        .bind(since)
        .fetch_one(pool)
        .await?;

    let current: (Option<Decimal>, Option<Decimal>) =
        sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>)>(
            "SELECT MIN(price), MAX(price) \
             FROM ( \
                 SELECT DISTINCT ON (sp.store_id) p.price \
                 FROM prices p \
                 JOIN store_products sp ON sp.id = p.store_product_id \
                 WHERE sp.product_id = $1 \
                 ORDER BY sp.store_id, p.recorded_at DESC, p.id DESC \
             ) latest",
        )
        .bind(product_id)
        .fetch_one(pool)
        .await?;

    Ok(HistoryStats {
        min_price: window.0,
        max_price: window.1,
        avg_price: window.2,
        current_min: current.0,
        current_max: current.1,
        price_points: window.3,
        special_count: window.4,
    })
}

//! Database operations for `products`, `store_products`, and `prices`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table — the canonical, store-independent product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category_id: Option<i64>,
    pub unit: Option<String>,
    pub size: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub is_key_product: bool,
    pub created_at: DateTime<Utc>,
}

/// A row from the `store_products` table — one store's listing of a product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreProductRow {
    pub id: i64,
    pub product_id: i64,
    pub store_id: i64,
    pub store_product_code: Option<String>,
    pub store_product_name: Option<String>,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
}

/// A row from the `prices` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceRow {
    pub id: i64,
    pub store_product_id: i64,
    pub price: Decimal,
    pub unit_price: Option<Decimal>,
    pub was_price: Option<Decimal>,
    pub is_special: bool,
    pub special_type: Option<String>,
    pub source: String,
    pub recorded_at: DateTime<Utc>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

/// The latest observed price at one store, with store context, as served by
/// the comparison endpoints.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StorePriceRow {
    pub store_id: i64,
    pub store_name: String,
    pub store_slug: String,
    pub price: Decimal,
    pub unit_price: Option<Decimal>,
    pub was_price: Option<Decimal>,
    pub is_special: bool,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Creates a product if no row with the same name, brand, and size exists,
/// returning the id either way.
///
/// Products have no natural unique key in the schema, so the lookup and
/// insert are two statements; a duplicate created by a concurrent ingest is
/// harmless (comparisons group by name) and rare enough to tolerate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn create_product(
    pool: &PgPool,
    name: &str,
    brand: Option<&str>,
    category_id: Option<i64>,
    unit: Option<&str>,
    size: Option<&str>,
    image_url: Option<&str>,
) -> Result<i64, DbError> {
    let existing: Option<i64> = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM products \
         WHERE name = $1 \
           AND brand IS NOT DISTINCT FROM $2 \
           AND size IS NOT DISTINCT FROM $3 \
         LIMIT 1",
    )
    .bind(name)
    .bind(brand)
    .bind(size)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, brand, category_id, unit, size, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(name)
    .bind(brand)
    .bind(category_id)
    .bind(unit)
    .bind(size)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetches a product by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, brand, category_id, unit, size, barcode, image_url, \
                is_key_product, created_at \
         FROM products \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Lists products, optionally restricted to a category set, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    category_ids: Option<&[i64]>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, brand, category_id, unit, size, barcode, image_url, \
                is_key_product, created_at \
         FROM products \
         WHERE ($1::BIGINT[] IS NULL OR category_id = ANY($1)) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2 OFFSET $3",
    )
    .bind(category_ids)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Case-insensitive search over product name and brand.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_products(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let pattern = format!("%{query}%");

    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, brand, category_id, unit, size, barcode, image_url, \
                is_key_product, created_at \
         FROM products \
         WHERE name ILIKE $1 OR brand ILIKE $1 \
         ORDER BY name \
         LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Candidate products for type matching: same category (when known) and the
/// same structured size, capped to keep the in-process fuzzy filter cheap.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn type_candidates(
    pool: &PgPool,
    category_id: Option<i64>,
    size: Option<&str>,
    limit: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, brand, category_id, unit, size, barcode, image_url, \
                is_key_product, created_at \
         FROM products \
         WHERE ($1::BIGINT IS NULL OR category_id = $1) \
           AND ($2::TEXT IS NULL OR size = $2) \
         ORDER BY id \
         LIMIT $3",
    )
    .bind(category_id)
    .bind(size)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// store_products operations
// ---------------------------------------------------------------------------

/// Upserts a store's listing of a product.
///
/// Conflicts on `(product_id, store_id)` refresh the store-side code, name,
/// and URLs. Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_store_product(
    pool: &PgPool,
    product_id: i64,
    store_id: i64,
    store_product_code: Option<&str>,
    store_product_name: Option<&str>,
    product_url: Option<&str>,
    image_url: Option<&str>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO store_products \
             (product_id, store_id, store_product_code, store_product_name, product_url, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (product_id, store_id) DO UPDATE SET \
             store_product_code = EXCLUDED.store_product_code, \
             store_product_name = EXCLUDED.store_product_name, \
             product_url        = EXCLUDED.product_url, \
             image_url          = EXCLUDED.image_url \
         RETURNING id",
    )
    .bind(product_id)
    .bind(store_id)
    .bind(store_product_code)
    .bind(store_product_name)
    .bind(product_url)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Looks up a store listing by the store's own product code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_store_product_by_code(
    pool: &PgPool,
    store_id: i64,
    store_product_code: &str,
) -> Result<Option<StoreProductRow>, DbError> {
    let row = sqlx::query_as::<_, StoreProductRow>(
        "SELECT id, product_id, store_id, store_product_code, store_product_name, \
                product_url, image_url \
         FROM store_products \
         WHERE store_id = $1 AND store_product_code = $2 \
         LIMIT 1",
    )
    .bind(store_id)
    .bind(store_product_code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

// ---------------------------------------------------------------------------
// prices operations
// ---------------------------------------------------------------------------

/// Records a price observation for a store listing.
///
/// Every observation is appended; history queries rely on the full ledger.
/// Returns the new price row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
#[allow(clippy::too_many_arguments)]
pub async fn insert_price(
    pool: &PgPool,
    store_product_id: i64,
    price: Decimal,
    unit_price: Option<Decimal>,
    was_price: Option<Decimal>,
    is_special: bool,
    source: &str,
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO prices \
             (store_product_id, price, unit_price, was_price, is_special, source, \
              valid_from, valid_to) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(store_product_id)
    .bind(price)
    .bind(unit_price)
    .bind(was_price)
    .bind(is_special)
    .bind(source)
    .bind(valid_from)
    .bind(valid_to)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// The cheapest of each store's current price for a product, as a full
/// price row. This is the observation alert evaluation compares against.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn cheapest_current_price(
    pool: &PgPool,
    product_id: i64,
) -> Result<Option<PriceRow>, DbError> {
    let row = sqlx::query_as::<_, PriceRow>(
        "SELECT id, store_product_id, price, unit_price, was_price, is_special, \
                special_type, source, recorded_at, valid_from, valid_to \
         FROM ( \
             SELECT DISTINCT ON (sp.store_id) p.* \
             FROM prices p \
             JOIN store_products sp ON sp.id = p.store_product_id \
             WHERE sp.product_id = $1 \
             ORDER BY sp.store_id, p.recorded_at DESC, p.id DESC \
         ) latest \
         ORDER BY price, id \
         LIMIT 1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Latest observed price per store for a product.
///
/// `DISTINCT ON (store id)` ordered by `recorded_at DESC, id DESC` picks the
/// newest observation even when several share a timestamp. Rows come back
/// cheapest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_price_per_store(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<StorePriceRow>, DbError> {
    let rows = sqlx::query_as::<_, StorePriceRow>(
        "SELECT store_id, store_name, store_slug, price, unit_price, was_price, \
                is_special, recorded_at \
         FROM ( \
             SELECT DISTINCT ON (s.id) \
                 s.id AS store_id, s.name AS store_name, s.slug AS store_slug, \
                 p.price, p.unit_price, p.was_price, p.is_special, p.recorded_at \
             FROM prices p \
             JOIN store_products sp ON sp.id = p.store_product_id \
             JOIN stores s ON s.id = sp.store_id \
             WHERE sp.product_id = $1 \
             ORDER BY s.id, p.recorded_at DESC, p.id DESC \
         ) latest \
         ORDER BY price, store_name",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

//! Database operations for the `specials` table — the weekly catalogue rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A specials row joined with its store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpecialRow {
    pub id: i64,
    pub store_id: i64,
    pub store_name: String,
    pub store_slug: String,
    pub name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub raw_category: Option<String>,
    pub category_id: Option<i64>,
    pub price: Decimal,
    pub was_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub unit_price: Option<String>,
    pub store_product_code: Option<String>,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub ingested_at: DateTime<Utc>,
}

/// Sort orders for the specials listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialSort {
    #[default]
    Discount,
    PriceLow,
    PriceHigh,
    Name,
}

impl SpecialSort {
    // Columns are sp-qualified: the store join also carries a name column.
    fn order_clause(self) -> &'static str {
        match self {
            SpecialSort::Discount => "sp.discount_percent DESC NULLS LAST, sp.price",
            SpecialSort::PriceLow => "sp.price, sp.name",
            SpecialSort::PriceHigh => "sp.price DESC, sp.name",
            SpecialSort::Name => "sp.name, sp.price",
        }
    }
}

/// Input filters for the specials listing.
#[derive(Debug, Clone, Default)]
pub struct SpecialFilters<'a> {
    pub store_slug: Option<&'a str>,
    /// Category ids to include; `None` means no category filtering. When
    /// `include_uncategorized` is set, rows with no category also pass.
    pub category_ids: Option<&'a [i64]>,
    pub include_uncategorized: bool,
    pub search: Option<&'a str>,
    pub min_discount: Option<i32>,
    pub sort: SpecialSort,
    pub limit: i64,
    pub offset: i64,
}

/// Per-store active special counts for the stats endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreSpecialCount {
    pub store_name: String,
    pub store_slug: String,
    pub count: i64,
}

/// Aggregate stats across currently-valid specials.
#[derive(Debug, Clone)]
pub struct SpecialsStats {
    pub total: i64,
    pub avg_discount: Option<Decimal>,
    pub max_discount: Option<i32>,
    pub per_store: Vec<StoreSpecialCount>,
}

const SPECIAL_SELECT: &str = "SELECT sp.id, sp.store_id, s.name AS store_name, s.slug AS store_slug, \
        sp.name, sp.brand, sp.size, sp.raw_category, sp.category_id, sp.price, \
        sp.was_price, sp.discount_percent, sp.unit_price, sp.store_product_code, \
        sp.product_url, sp.image_url, sp.valid_from, sp.valid_to, sp.ingested_at \
     FROM specials sp \
     JOIN stores s ON s.id = sp.store_id";

const SPECIAL_FILTER: &str = "WHERE sp.valid_to >= $1 \
       AND ($2::TEXT IS NULL OR s.slug = $2) \
       AND ($3::BIGINT[] IS NULL OR sp.category_id = ANY($3) \
            OR ($4::BOOL AND sp.category_id IS NULL)) \
       AND ($5::TEXT IS NULL OR sp.name ILIKE $5 OR sp.brand ILIKE $5) \
       AND ($6::INT IS NULL OR sp.discount_percent >= $6)";

/// Upserts one normalized special.
///
/// Conflicts on `(store_id, store_product_code, valid_from)` — the same
/// catalogue line re-ingested within a week — refresh pricing and category
/// in place. Returns the row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_special(
    pool: &PgPool,
    store_id: i64,
    category_id: Option<i64>,
    special: &trolley_core::NormalizedSpecial,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO specials \
             (store_id, name, brand, size, raw_category, category_id, price, was_price, \
              discount_percent, unit_price, store_product_code, product_url, image_url, \
              valid_from, valid_to, ingested_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW()) \
         ON CONFLICT (store_id, store_product_code, valid_from) DO UPDATE SET \
             name             = EXCLUDED.name, \
             brand            = EXCLUDED.brand, \
             size             = EXCLUDED.size, \
             raw_category     = EXCLUDED.raw_category, \
             category_id      = EXCLUDED.category_id, \
             price            = EXCLUDED.price, \
             was_price        = EXCLUDED.was_price, \
             discount_percent = EXCLUDED.discount_percent, \
             unit_price       = EXCLUDED.unit_price, \
             product_url      = EXCLUDED.product_url, \
             image_url        = EXCLUDED.image_url, \
             valid_to         = EXCLUDED.valid_to, \
             ingested_at      = NOW() \
         RETURNING id",
    )
    .bind(store_id)
    .bind(&special.name)
    .bind(&special.brand)
    .bind(&special.size)
    .bind(&special.raw_category)
    .bind(category_id)
    .bind(special.price)
    .bind(special.was_price)
    .bind(special.discount_percent)
    .bind(&special.unit_price)
    .bind(&special.store_product_code)
    .bind(&special.product_url)
    .bind(&special.image_url)
    .bind(special.valid_from)
    .bind(special.valid_to)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists currently-valid specials with filters, sorting, and pagination.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_specials(
    pool: &PgPool,
    today: NaiveDate,
    filters: SpecialFilters<'_>,
) -> Result<Vec<SpecialRow>, DbError> {
    let search_pattern = filters.search.map(|s| format!("%{s}%"));

    let sql = format!(
        "{SPECIAL_SELECT} {SPECIAL_FILTER} ORDER BY {} LIMIT $7 OFFSET $8",
        filters.sort.order_clause()
    );

    let rows = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(today)
        .bind(filters.store_slug)
        .bind(filters.category_ids)
        .bind(filters.include_uncategorized)
        .bind(search_pattern)
        .bind(filters.min_discount)
        .bind(filters.limit)
        .bind(filters.offset)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Total row count for the same filters as [`list_specials`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_specials(
    pool: &PgPool,
    today: NaiveDate,
    filters: &SpecialFilters<'_>,
) -> Result<i64, DbError> {
    let search_pattern = filters.search.map(|s| format!("%{s}%"));

    let sql = format!(
        "SELECT COUNT(*) FROM specials sp JOIN stores s ON s.id = sp.store_id {SPECIAL_FILTER}"
    );

    let count: i64 = sqlx::query_scalar::<_, i64>(&sql)
        .bind(today)
        .bind(filters.store_slug)
        .bind(filters.category_ids)
        .bind(filters.include_uncategorized)
        .bind(search_pattern)
        .bind(filters.min_discount)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Fetches one special by id, with store context.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_special(pool: &PgPool, id: i64) -> Result<SpecialRow, DbError> {
    let sql = format!("{SPECIAL_SELECT} WHERE sp.id = $1");

    let row = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or(DbError::NotFound)
}

/// Aggregate stats for the dashboard: totals, discount spread, per-store
/// breakdown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn specials_stats(pool: &PgPool, today: NaiveDate) -> Result<SpecialsStats, DbError> {
    let (total, avg_discount, max_discount): (i64, Option<Decimal>, Option<i32>) =
        sqlx::query_as::<_, (i64, Option<Decimal>, Option<i32>)>(
            "SELECT COUNT(*), AVG(discount_percent)::numeric(10,2), MAX(discount_percent) \
             FROM specials \
             WHERE valid_to >= $1",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

    let per_store = sqlx::query_as::<_, StoreSpecialCount>(
        "SELECT s.name AS store_name, s.slug AS store_slug, COUNT(sp.id) AS count \
         FROM stores s \
         LEFT JOIN specials sp ON sp.store_id = s.id AND sp.valid_to >= $1 \
         GROUP BY s.id, s.name, s.slug \
         ORDER BY s.name",
    )
    .bind(today)
    .fetch_all(pool)
    .await?;

    Ok(SpecialsStats {
        total,
        avg_discount,
        max_discount,
        per_store,
    })
}

/// Deletes specials whose validity ended before `cutoff`.
///
/// Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_expired_specials(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, DbError> {
    let deleted = sqlx::query("DELETE FROM specials WHERE valid_to < $1")
        .bind(cutoff)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted)
}

/// Currently-valid specials whose name or brand matches `search`, ordered so
/// identical products group together.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_current_specials(
    pool: &PgPool,
    today: NaiveDate,
    search: &str,
) -> Result<Vec<SpecialRow>, DbError> {
    let pattern = format!("%{search}%");
    let sql = format!(
        "{SPECIAL_SELECT} \
         WHERE sp.valid_to >= $1 AND (sp.name ILIKE $2 OR sp.brand ILIKE $2) \
         ORDER BY sp.name, sp.price"
    );

    let rows = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(today)
        .bind(pattern)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// All currently-valid specials carrying the given brand, cheapest first.
/// Brand comparison is case-insensitive.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn current_specials_by_brand(
    pool: &PgPool,
    today: NaiveDate,
    brand: &str,
) -> Result<Vec<SpecialRow>, DbError> {
    let sql = format!(
        "{SPECIAL_SELECT} \
         WHERE sp.valid_to >= $1 AND sp.brand ILIKE $2 \
         ORDER BY sp.price"
    );

    let rows = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(today)
        .bind(brand)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Candidates for specials type matching: currently valid, not the reference
/// row itself, same category and size when those are known. The in-process
/// similarity filter makes the final call.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn type_match_candidates(
    pool: &PgPool,
    today: NaiveDate,
    exclude_id: i64,
    category_id: Option<i64>,
    size: Option<&str>,
) -> Result<Vec<SpecialRow>, DbError> {
    let sql = format!(
        "{SPECIAL_SELECT} \
         WHERE sp.valid_to >= $1 \
           AND sp.id <> $2 \
           AND ($3::BIGINT IS NULL OR sp.category_id = $3) \
           AND ($4::TEXT IS NULL OR sp.size = $4) \
         ORDER BY sp.price"
    );

    let rows = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(today)
        .bind(exclude_id)
        .bind(category_id)
        .bind(size)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Distinct non-null brands across all specials, for brand extraction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn distinct_special_brands(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let brands: Vec<String> = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT brand FROM specials WHERE brand IS NOT NULL ORDER BY brand",
    )
    .fetch_all(pool)
    .await?;

    Ok(brands)
}

/// Specials without a category, for the categorization backfill.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_uncategorized_specials(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<SpecialRow>, DbError> {
    let sql = format!("{SPECIAL_SELECT} WHERE sp.category_id IS NULL ORDER BY sp.id LIMIT $1");

    let rows = sqlx::query_as::<_, SpecialRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Assigns a category to one special.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_special_category(
    pool: &PgPool,
    special_id: i64,
    category_id: i64,
) -> Result<(), DbError> {
    sqlx::query("UPDATE specials SET category_id = $2 WHERE id = $1")
        .bind(special_id)
        .bind(category_id)
        .execute(pool)
        .await?;

    Ok(())
}

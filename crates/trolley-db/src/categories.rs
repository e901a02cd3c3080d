//! Database operations for the category taxonomy.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub display_order: i32,
    pub icon: Option<String>,
}

/// Count of currently-valid specials for one category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategorySpecialCount {
    pub category_id: i64,
    pub count: i64,
}

/// Lists the full taxonomy, parents first, each level in display order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, slug, parent_id, display_order, icon \
         FROM categories \
         ORDER BY parent_id NULLS FIRST, display_order, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a category by slug.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the slug is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_category_by_slug(pool: &PgPool, slug: &str) -> Result<CategoryRow, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, slug, parent_id, display_order, icon \
         FROM categories \
         WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Resolves a category slug to the ids of the category itself plus all of
/// its children. Filtering specials by a parent category means filtering by
/// this whole set.
///
/// Returns an empty vector for an unknown slug.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn category_ids_with_children(pool: &PgPool, slug: &str) -> Result<Vec<i64>, DbError> {
    let ids: Vec<i64> = sqlx::query_scalar::<_, i64>(
        "SELECT c.id \
         FROM categories c \
         WHERE c.slug = $1 \
            OR c.parent_id = (SELECT id FROM categories WHERE slug = $1)",
    )
    .bind(slug)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Per-category counts of specials still valid on `today`.
///
/// Only categories with at least one active special appear; the caller rolls
/// leaf counts up into parents when building the tree view.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_special_counts(
    pool: &PgPool,
    today: NaiveDate,
) -> Result<Vec<CategorySpecialCount>, DbError> {
    let rows = sqlx::query_as::<_, CategorySpecialCount>(
        "SELECT category_id, COUNT(*) AS count \
         FROM specials \
         WHERE valid_to >= $1 \
           AND category_id IS NOT NULL \
         GROUP BY category_id",
    )
    .bind(today)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Number of currently-valid specials the categorizer could not place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn uncategorized_special_count(pool: &PgPool, today: NaiveDate) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM specials WHERE valid_to >= $1 AND category_id IS NULL",
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

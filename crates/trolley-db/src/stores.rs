//! Database operations for the `stores` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub catalogue_url: Option<String>,
    pub specials_day: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lists all stores ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, slug, logo_url, website_url, catalogue_url, specials_day, created_at \
         FROM stores \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a store by slug.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no store has the slug, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_store_by_slug(pool: &PgPool, slug: &str) -> Result<StoreRow, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(
        "SELECT id, name, slug, logo_url, website_url, catalogue_url, specials_day, created_at \
         FROM stores \
         WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

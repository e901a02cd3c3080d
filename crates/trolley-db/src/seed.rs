//! Seeding of stores (from YAML config) and the category taxonomy (from
//! the classifier's definitions).

use std::collections::HashMap;

use sqlx::PgPool;
use trolley_core::stores::StoreConfig;

use crate::DbError;

/// Upsert stores from config into the database.
///
/// Returns the number of stores processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_stores(pool: &PgPool, stores: &[StoreConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for store in stores {
        let slug = store.slug();

        sqlx::query(
            "INSERT INTO stores (name, slug, logo_url, website_url, catalogue_url, specials_day) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name          = EXCLUDED.name, \
                 logo_url      = EXCLUDED.logo_url, \
                 website_url   = EXCLUDED.website_url, \
                 catalogue_url = EXCLUDED.catalogue_url, \
                 specials_day  = EXCLUDED.specials_day",
        )
        .bind(&store.name)
        .bind(&slug)
        .bind(&store.logo_url)
        .bind(&store.website_url)
        .bind(&store.catalogue_url)
        .bind(&store.specials_day)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}

/// Upsert the category taxonomy from the classifier's definitions.
///
/// Parents are written first so leaves can resolve their parent ids in the
/// same pass. Returns the number of categories processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_categories(pool: &PgPool) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    let mut parent_ids: HashMap<&str, i64> = HashMap::new();

    for category in trolley_classify::PARENT_CATEGORIES {
        let id: i64 = sqlx::query_scalar::<_, i64>(
            "INSERT INTO categories (name, slug, parent_id, display_order, icon) \
             VALUES ($1, $2, NULL, $3, $4) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name          = EXCLUDED.name, \
                 display_order = EXCLUDED.display_order, \
                 icon          = EXCLUDED.icon \
             RETURNING id",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(category.display_order)
        .bind(category.icon)
        .fetch_one(&mut *tx)
        .await?;

        parent_ids.insert(category.slug, id);
        count += 1;
    }

    for category in trolley_classify::LEAF_CATEGORIES {
        let parent_id = category
            .parent
            .and_then(|slug| parent_ids.get(slug).copied());

        sqlx::query(
            "INSERT INTO categories (name, slug, parent_id, display_order, icon) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name          = EXCLUDED.name, \
                 parent_id     = EXCLUDED.parent_id, \
                 display_order = EXCLUDED.display_order, \
                 icon          = EXCLUDED.icon",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(parent_id)
        .bind(category.display_order)
        .bind(category.icon)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}

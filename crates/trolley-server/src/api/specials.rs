//! Specials listing, stats, and the category tree.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cache::ResponseCache;
use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SpecialsQuery {
    pub store: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_discount: Option<i32>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SpecialItem {
    pub id: i64,
    pub store_name: String,
    pub store_slug: String,
    pub name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub category_id: Option<i64>,
    pub price: Decimal,
    pub was_price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub unit_price: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SpecialsList {
    pub items: Vec<SpecialItem>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoreCount {
    pub store_name: String,
    pub store_slug: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SpecialsStatsData {
    pub total: i64,
    pub avg_discount: Option<Decimal>,
    pub max_discount: Option<i32>,
    pub per_store: Vec<StoreCount>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubcategoryItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryTreeItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub count: i64,
    pub subcategories: Vec<SubcategoryItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct CategoryTree {
    pub categories: Vec<CategoryTreeItem>,
    pub total_categorized: i64,
    pub total_uncategorized: i64,
}

fn parse_sort(sort: Option<&str>) -> trolley_db::SpecialSort {
    match sort {
        Some("price_low") => trolley_db::SpecialSort::PriceLow,
        Some("price_high") => trolley_db::SpecialSort::PriceHigh,
        Some("name") => trolley_db::SpecialSort::Name,
        _ => trolley_db::SpecialSort::Discount,
    }
}

fn special_item(row: trolley_db::SpecialRow) -> SpecialItem {
    SpecialItem {
        id: row.id,
        store_name: row.store_name,
        store_slug: row.store_slug,
        name: row.name,
        brand: row.brand,
        size: row.size,
        category_id: row.category_id,
        price: row.price,
        was_price: row.was_price,
        discount_percent: row.discount_percent,
        unit_price: row.unit_price,
        image_url: row.image_url,
        product_url: row.product_url,
        valid_to: row.valid_to,
    }
}

/// Current specials with filtering, sorting, and pagination. Responses are
/// served from the TTL cache when the same filter combination was asked
/// recently.
pub(super) async fn list_specials(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SpecialsQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let limit = normalize_limit(query.limit);
    let offset = query.offset.unwrap_or(0).max(0);

    let cache_key = ResponseCache::key(
        "specials",
        &[
            ("store", query.store.clone().unwrap_or_default()),
            ("category", query.category.clone().unwrap_or_default()),
            ("search", query.search.clone().unwrap_or_default()),
            (
                "min_discount",
                query.min_discount.map(|d| d.to_string()).unwrap_or_default(),
            ),
            ("sort", query.sort.clone().unwrap_or_default()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ],
    );

    if let Some(cached) = state.specials_cache.get(&cache_key).await {
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let today = Utc::now().date_naive();

    let category_ids = match query.category.as_deref() {
        Some(slug) => {
            let ids = trolley_db::category_ids_with_children(&state.pool, slug)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            if ids.is_empty() {
                return Err(ApiError::not_found(req_id.0, "category"));
            }
            Some(ids)
        }
        None => None,
    };

    let filters = trolley_db::SpecialFilters {
        store_slug: query.store.as_deref(),
        category_ids: category_ids.as_deref(),
        include_uncategorized: false,
        search: query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        min_discount: query.min_discount,
        sort: parse_sort(query.sort.as_deref()),
        limit,
        offset,
    };

    let total = trolley_db::count_specials(&state.pool, today, &filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let rows = trolley_db::list_specials(&state.pool, today, filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let list = SpecialsList {
        items: rows.into_iter().map(special_item).collect(),
        total,
        limit,
        offset,
    };

    let data = serde_json::to_value(&list).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize specials list");
        ApiError::new(req_id.0.clone(), "internal_error", "serialization failed")
    })?;

    state.specials_cache.put(cache_key, data.clone()).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// One special by id.
pub(super) async fn get_special(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(special_id): Path<i64>,
) -> Result<Json<ApiResponse<SpecialItem>>, ApiError> {
    let row = trolley_db::get_special(&state.pool, special_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "special"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: special_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Aggregate stats over current specials, cached on a longer TTL.
pub(super) async fn get_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let cache_key = ResponseCache::key("stats", &[]);

    if let Some(cached) = state.stats_cache.get(&cache_key).await {
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let today = Utc::now().date_naive();
    let stats = trolley_db::specials_stats(&state.pool, today)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = SpecialsStatsData {
        total: stats.total,
        avg_discount: stats.avg_discount,
        max_discount: stats.max_discount,
        per_store: stats
            .per_store
            .into_iter()
            .map(|s| StoreCount {
                store_name: s.store_name,
                store_slug: s.store_slug,
                count: s.count,
            })
            .collect(),
    };

    let data = serde_json::to_value(&data).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize specials stats");
        ApiError::new(req_id.0.clone(), "internal_error", "serialization failed")
    })?;

    state.stats_cache.put(cache_key, data.clone()).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// The category tree with per-category counts of current specials. Leaf
/// counts roll up into their parents.
pub(super) async fn get_category_tree(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CategoryTree>>, ApiError> {
    let today = Utc::now().date_naive();

    let categories = trolley_db::list_categories(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let counts = trolley_db::list_active_special_counts(&state.pool, today)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let total_uncategorized = trolley_db::uncategorized_special_count(&state.pool, today)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let count_map: std::collections::HashMap<i64, i64> = counts
        .iter()
        .map(|c| (c.category_id, c.count))
        .collect();
    let total_categorized: i64 = counts.iter().map(|c| c.count).sum();

    let mut tree: Vec<CategoryTreeItem> = Vec::new();
    for parent in categories.iter().filter(|c| c.parent_id.is_none()) {
        let mut parent_count = count_map.get(&parent.id).copied().unwrap_or(0);

        let subcategories: Vec<SubcategoryItem> = categories
            .iter()
            .filter(|c| c.parent_id == Some(parent.id))
            .map(|sub| {
                let count = count_map.get(&sub.id).copied().unwrap_or(0);
                parent_count += count;
                SubcategoryItem {
                    id: sub.id,
                    name: sub.name.clone(),
                    slug: sub.slug.clone(),
                    count,
                }
            })
            .collect();

        tree.push(CategoryTreeItem {
            id: parent.id,
            name: parent.name.clone(),
            slug: parent.slug.clone(),
            icon: parent.icon.clone(),
            count: parent_count,
            subcategories,
        });
    }

    Ok(Json(ApiResponse {
        data: CategoryTree {
            categories: tree,
            total_categorized,
            total_uncategorized,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort_recognizes_known_values() {
        assert_eq!(parse_sort(Some("price_low")), trolley_db::SpecialSort::PriceLow);
        assert_eq!(parse_sort(Some("price_high")), trolley_db::SpecialSort::PriceHigh);
        assert_eq!(parse_sort(Some("name")), trolley_db::SpecialSort::Name);
    }

    #[test]
    fn parse_sort_defaults_to_discount() {
        assert_eq!(parse_sort(None), trolley_db::SpecialSort::Discount);
        assert_eq!(parse_sort(Some("bogus")), trolley_db::SpecialSort::Discount);
    }
}

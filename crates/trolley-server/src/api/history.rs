//! Price-history endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MIN_DAYS: i64 = 7;
const MAX_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub days: Option<i64>,
    pub store_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct PricePoint {
    pub date: String,
    pub price: Decimal,
    pub is_special: bool,
    pub store_name: String,
    pub store_slug: String,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryStatsData {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub current_min: Option<Decimal>,
    pub current_max: Option<Decimal>,
    pub price_points: i64,
    pub special_count: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryResponse {
    pub product_id: i64,
    pub product_name: String,
    pub product_brand: Option<String>,
    pub days: i64,
    pub history: Vec<PricePoint>,
    pub stats: HistoryStatsData,
}

#[derive(Debug, Serialize)]
pub(super) struct HistorySummary {
    pub product_id: i64,
    pub product_name: String,
    pub current_min: Option<Decimal>,
    pub current_max: Option<Decimal>,
    pub price_points: i64,
}

fn stats_data(stats: trolley_db::HistoryStats) -> HistoryStatsData {
    HistoryStatsData {
        min_price: stats.min_price,
        max_price: stats.max_price,
        avg_price: stats.avg_price,
        current_min: stats.current_min,
        current_max: stats.current_max,
        price_points: stats.price_points,
        special_count: stats.special_count,
    }
}

/// Full price history for a product over a day window, with aggregates.
pub(super) async fn get_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponse>>, ApiError> {
    let product = trolley_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let days = query.days.unwrap_or(90).clamp(MIN_DAYS, MAX_DAYS);
    let since = Utc::now() - Duration::days(days);

    let rows = trolley_db::price_history(&state.pool, product_id, since, query.store_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let stats = trolley_db::price_history_stats(&state.pool, product_id, since)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let history = rows
        .into_iter()
        .map(|row| PricePoint {
            date: row.recorded_at.format("%Y-%m-%d").to_string(),
            price: row.price,
            is_special: row.is_special,
            store_name: row.store_name,
            store_slug: row.store_slug,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: HistoryResponse {
            product_id,
            product_name: product.name,
            product_brand: product.brand,
            days,
            history,
            stats: stats_data(stats),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Lightweight summary: the current per-store price spread without the full
/// point series.
pub(super) async fn get_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<HistorySummary>>, ApiError> {
    let product = trolley_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let since = Utc::now() - Duration::days(30);
    let stats = trolley_db::price_history_stats(&state.pool, product_id, since)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: HistorySummary {
            product_id,
            product_name: product.name,
            current_min: stats.current_min,
            current_max: stats.current_max,
            price_points: stats.price_points,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

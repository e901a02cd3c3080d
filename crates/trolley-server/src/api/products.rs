//! Catalog product endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ProductsQuery {
    /// Search term over name and brand; plain listing when absent.
    pub q: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub category_id: Option<i64>,
    pub unit: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub is_key_product: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateProductRequest {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedProduct {
    pub id: i64,
    pub category_slug: Option<String>,
}

fn product_item(row: trolley_db::ProductRow) -> ProductItem {
    ProductItem {
        id: row.id,
        name: row.name,
        brand: row.brand,
        category_id: row.category_id,
        unit: row.unit,
        size: row.size,
        image_url: row.image_url,
        is_key_product: row.is_key_product,
        created_at: row.created_at,
    }
}

/// Lists or searches catalog products.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let limit = normalize_limit(query.limit);

    let rows = if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| q.len() >= 2) {
        trolley_db::search_products(&state.pool, q, limit)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    } else {
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

        trolley_db::list_products(
            &state.pool,
            category_ids.as_deref(),
            limit,
            query.offset.unwrap_or(0).max(0),
        )
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    };

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(product_item).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// One product by id.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let row = trolley_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: product_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Creates a catalog product. The category can be given explicitly as a
/// slug; otherwise the classifier has a go at the name and brand.
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<CreatedProduct>>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "name must not be empty",
        ));
    }

    let category_slug = request
        .category
        .as_deref()
        .map(ToString::to_string)
        .or_else(|| {
            trolley_classify::categorize(name, request.brand.as_deref()).map(ToString::to_string)
        });

    let category_id = match category_slug.as_deref() {
        Some(slug) => match trolley_db::get_category_by_slug(&state.pool, slug).await {
            Ok(category) => Some(category.id),
            Err(trolley_db::DbError::NotFound) => {
                return Err(ApiError::new(
                    req_id.0,
                    "validation_error",
                    format!("unknown category slug \"{slug}\""),
                ));
            }
            Err(e) => return Err(map_db_error(req_id.0, &e)),
        },
        None => None,
    };

    let id = trolley_db::create_product(
        &state.pool,
        name,
        request.brand.as_deref(),
        category_id,
        request.unit.as_deref(),
        request.size.as_deref(),
        request.image_url.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CreatedProduct { id, category_slug },
        meta: ResponseMeta::new(req_id.0),
    }))
}

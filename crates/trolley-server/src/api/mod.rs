mod alerts;
mod compare;
mod history;
mod products;
mod specials;

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::cache::ResponseCache;
use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub specials_cache: ResponseCache,
    pub stats_cache: ResponseCache,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, specials_ttl: Duration, stats_ttl: Duration) -> Self {
        Self {
            pool,
            specials_cache: ResponseCache::new(specials_ttl),
            stats_cache: ResponseCache::new(stats_ttl),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn not_found(request_id: impl Into<String>, what: &str) -> Self {
        Self::new(request_id, "not_found", format!("{what} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &trolley_db::DbError) -> ApiError {
    if matches!(error, trolley_db::DbError::NotFound) {
        return ApiError::not_found(request_id, "record");
    }
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/v1/products/{product_id}", get(products::get_product))
        .route("/api/v1/users", post(alerts::create_user))
        .route("/api/v1/specials", get(specials::list_specials))
        .route("/api/v1/specials/stats", get(specials::get_stats))
        .route("/api/v1/specials/{special_id}", get(specials::get_special))
        .route("/api/v1/categories/tree", get(specials::get_category_tree))
        .route(
            "/api/v1/compare/products/{product_id}",
            get(compare::compare_product),
        )
        .route("/api/v1/compare/basket", post(compare::compare_basket))
        .route(
            "/api/v1/compare/types/{product_id}",
            get(compare::compare_product_type),
        )
        .route(
            "/api/v1/compare/specials/brand-match",
            get(compare::compare_specials_brand_match),
        )
        .route(
            "/api/v1/compare/specials/type-match/{special_id}",
            get(compare::compare_specials_type_match),
        )
        .route(
            "/api/v1/compare/specials/brand-products/{special_id}",
            get(compare::get_brand_products),
        )
        .route("/api/v1/history/{product_id}", get(history::get_history))
        .route(
            "/api/v1/history/{product_id}/summary",
            get(history::get_summary),
        )
        .route(
            "/api/v1/alerts",
            get(alerts::list_alerts).post(alerts::create_alert),
        )
        .route(
            "/api/v1/alerts/notifications",
            get(alerts::list_notifications),
        )
        .route(
            "/api/v1/alerts/notifications/count",
            get(alerts::unread_count),
        )
        .route(
            "/api/v1/alerts/notifications/{notification_id}/read",
            post(alerts::mark_read),
        )
        .route(
            "/api/v1/alerts/notifications/read-all",
            post(alerts::mark_all_read),
        )
        .route(
            "/api/v1/alerts/{alert_id}",
            get(alerts::get_alert)
                .patch(alerts::update_alert)
                .delete(alerts::delete_alert),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match trolley_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn test_state(pool: sqlx::PgPool) -> AppState {
        AppState::new(pool, Duration::from_secs(0), Duration::from_secs(0))
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::not_found("req-1", "product").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // -------------------------------------------------------------------------
    // Route integration tests (with DB)
    // -------------------------------------------------------------------------

    async fn seed_store(pool: &sqlx::PgPool, slug: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO stores (name, slug) VALUES ($1, $2) RETURNING id",
        )
        .bind(format!("Store {slug}"))
        .bind(slug)
        .fetch_one(pool)
        .await
        .expect("seed_store failed")
    }

    async fn seed_product_with_price(pool: &sqlx::PgPool, store_id: i64, price: &str) -> i64 {
        let product_id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, brand, size) \
             VALUES ('Full Cream Milk 2L', 'Pauls', '2l') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .expect("insert product");

        let listing_id: i64 = sqlx::query_scalar(
            "INSERT INTO store_products (product_id, store_id, store_product_code) \
             VALUES ($1, $2, '100') RETURNING id",
        )
        .bind(product_id)
        .bind(store_id)
        .fetch_one(pool)
        .await
        .expect("insert listing");

        sqlx::query(
            "INSERT INTO prices (store_product_id, price, source) VALUES ($1, $2::numeric(10,2), 'feed')",
        )
        .bind(listing_id)
        .bind(price)
        .execute(pool)
        .await
        .expect("insert price");

        product_id
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn compare_product_returns_cheapest_store(pool: sqlx::PgPool) {
        let woolworths = seed_store(&pool, "woolworths").await;
        let coles = seed_store(&pool, "coles").await;
        let product_id = seed_product_with_price(&pool, woolworths, "4.50").await;

        // Second store listing for the same product, cheaper.
        let listing_id: i64 = sqlx::query_scalar(
            "INSERT INTO store_products (product_id, store_id, store_product_code) \
             VALUES ($1, $2, '200') RETURNING id",
        )
        .bind(product_id)
        .bind(coles)
        .fetch_one(&pool)
        .await
        .expect("insert listing");
        sqlx::query(
            "INSERT INTO prices (store_product_id, price, source) VALUES ($1, 4.20, 'feed')",
        )
        .bind(listing_id)
        .execute(&pool)
        .await
        .expect("insert price");

        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        let app = build_app(test_state(pool), auth, default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/compare/products/{product_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["cheapest_store"].as_str(), Some("Store coles"));
        let stores = json["data"]["stores"].as_array().expect("stores array");
        assert_eq!(stores.len(), 2);
        // Sorted cheapest first; the dearer store carries savings.
        assert_eq!(stores[0]["store_slug"].as_str(), Some("coles"));
        assert_eq!(stores[1]["savings"].as_str(), Some("0.30"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn compare_product_unknown_id_is_404(pool: sqlx::PgPool) {
        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        let app = build_app(test_state(pool), auth, default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/compare/products/999999")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn specials_list_returns_seeded_special(pool: sqlx::PgPool) {
        let store_id = seed_store(&pool, "woolworths").await;
        sqlx::query(
            "INSERT INTO specials (store_id, name, price, discount_percent, valid_from, valid_to) \
             VALUES ($1, 'Tim Tam Original 200g', 2.75, 50, CURRENT_DATE - 1, CURRENT_DATE + 5)",
        )
        .bind(store_id)
        .execute(&pool)
        .await
        .expect("insert special");

        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        let app = build_app(test_state(pool), auth, default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/specials?store=woolworths")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let items = json["data"]["items"].as_array().expect("items array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"].as_str(), Some("Tim Tam Original 200g"));
        assert_eq!(json["data"]["total"].as_i64(), Some(1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn category_tree_rolls_leaf_counts_into_parents(pool: sqlx::PgPool) {
        trolley_db::seed::seed_categories(&pool)
            .await
            .expect("seed categories");
        let store_id = seed_store(&pool, "coles").await;

        let leaf: i64 =
            sqlx::query_scalar("SELECT id FROM categories WHERE slug = 'canned-food'")
                .fetch_one(&pool)
                .await
                .expect("leaf id");
        sqlx::query(
            "INSERT INTO specials (store_id, name, category_id, price, valid_from, valid_to) \
             VALUES ($1, 'John West Tuna 95g', $2, 1.50, CURRENT_DATE - 1, CURRENT_DATE + 5)",
        )
        .bind(store_id)
        .bind(leaf)
        .execute(&pool)
        .await
        .expect("insert special");

        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        let app = build_app(test_state(pool), auth, default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/categories/tree")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let categories = json["data"]["categories"].as_array().expect("categories");
        let pantry = categories
            .iter()
            .find(|c| c["slug"] == "pantry")
            .expect("pantry present");
        assert_eq!(pantry["count"].as_i64(), Some(1), "leaf count rolls up");
        let canned = pantry["subcategories"]
            .as_array()
            .expect("subcategories")
            .iter()
            .find(|c| c["slug"] == "canned-food")
            .expect("canned-food present");
        assert_eq!(canned["count"].as_i64(), Some(1));
        assert_eq!(json["data"]["total_categorized"].as_i64(), Some(1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn alert_crud_roundtrip(pool: sqlx::PgPool) {
        let store_id = seed_store(&pool, "woolworths").await;
        let product_id = seed_product_with_price(&pool, store_id, "4.50").await;
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email) VALUES ('shopper@example.com') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .expect("user");

        let auth = crate::middleware::AuthState::from_env(true).expect("auth");
        let app = build_app(test_state(pool), auth, default_rate_limit_state());

        let create = Request::builder()
            .method("POST")
            .uri("/api/v1/alerts")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "user_id": user_id,
                    "product_id": product_id,
                    "alert_type": "price_drop",
                    "notify_any_drop": true,
                    "notify_special": false
                })
                .to_string(),
            ))
            .expect("request");
        let response = app.clone().oneshot(create).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let alert_id = json["data"]["id"].as_i64().expect("alert id");
        assert_eq!(json["data"]["product_name"].as_str(), Some("Full Cream Milk 2L"));

        let list = Request::builder()
            .uri(format!("/api/v1/alerts?user_id={user_id}"))
            .body(Body::empty())
            .expect("request");
        let response = app.clone().oneshot(list).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/alerts/{alert_id}"))
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(delete).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn store_price_item_serializes_decimal_as_string() {
        let item = compare::StorePriceItem {
            store_id: 1,
            store_name: "Woolworths".to_string(),
            store_slug: "woolworths".to_string(),
            price: Decimal::new(450, 2),
            unit_price: None,
            was_price: None,
            is_special: false,
            savings: None,
        };
        let json = serde_json::to_string(&item).expect("serialize");
        assert!(json.contains("\"price\":\"4.50\""));
    }
}

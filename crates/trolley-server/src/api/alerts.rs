//! Alert and notification endpoints, plus minimal user creation.
//!
//! Alerts belong to users; callers pass the owning `user_id` explicitly.
//! Request authentication is the bearer-key middleware — there is no
//! per-user session layer in this service.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const ALERT_TYPES: &[&str] = &["price_drop", "special", "threshold"];

#[derive(Debug, Deserialize)]
pub(super) struct UserScope {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertListQuery {
    pub user_id: i64,
    pub active_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateAlertRequest {
    pub user_id: i64,
    pub product_id: i64,
    pub alert_type: Option<String>,
    pub threshold_price: Option<Decimal>,
    pub notify_any_drop: Option<bool>,
    pub notify_special: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateAlertRequest {
    pub threshold_price: Option<Decimal>,
    pub notify_any_drop: Option<bool>,
    pub notify_special: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_brand: Option<String>,
    pub alert_type: String,
    pub threshold_price: Option<Decimal>,
    pub notify_any_drop: bool,
    pub notify_special: bool,
    pub is_active: bool,
    pub last_price_seen: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct NotificationItem {
    pub id: i64,
    pub alert_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub old_price: Option<Decimal>,
    pub new_price: Option<Decimal>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NotificationsQuery {
    pub user_id: i64,
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct UnreadCount {
    pub unread: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateUserRequest {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedUser {
    pub id: i64,
    pub email: String,
}

fn alert_item(row: trolley_db::AlertRow) -> AlertItem {
    AlertItem {
        id: row.id,
        user_id: row.user_id,
        product_id: row.product_id,
        product_name: row.product_name,
        product_brand: row.product_brand,
        alert_type: row.alert_type,
        threshold_price: row.threshold_price,
        notify_any_drop: row.notify_any_drop,
        notify_special: row.notify_special,
        is_active: row.is_active,
        last_price_seen: row.last_price_seen,
        created_at: row.created_at,
    }
}

fn notification_item(row: trolley_db::NotificationRow) -> NotificationItem {
    NotificationItem {
        id: row.id,
        alert_id: row.alert_id,
        product_id: row.product_id,
        product_name: row.product_name,
        old_price: row.old_price,
        new_price: row.new_price,
        read_at: row.read_at,
        created_at: row.created_at,
    }
}

/// Creates (or refreshes) a user by email.
pub(super) async fn create_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<CreatedUser>>, ApiError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "a valid email is required",
        ));
    }

    let id = trolley_db::create_user(&state.pool, &email, request.display_name.as_deref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CreatedUser { id, email },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Lists a user's alerts.
pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<ApiResponse<Vec<AlertItem>>>, ApiError> {
    let rows = trolley_db::list_alerts_for_user(
        &state.pool,
        query.user_id,
        query.active_only.unwrap_or(true),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(alert_item).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Creates an alert and returns it with product context.
pub(super) async fn create_alert(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<CreateAlertRequest>,
) -> Result<Json<ApiResponse<AlertItem>>, ApiError> {
    let alert_type = request
        .alert_type
        .unwrap_or_else(|| "price_drop".to_string());
    if !ALERT_TYPES.contains(&alert_type.as_str()) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("alert_type must be one of: {}", ALERT_TYPES.join(", ")),
        ));
    }

    if alert_type == "threshold" && request.threshold_price.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "threshold alerts require threshold_price",
        ));
    }

    // Surface unknown user/product ids as 404 instead of a constraint error.
    trolley_db::get_user(&state.pool, request.user_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "user"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;
    trolley_db::get_product(&state.pool, request.product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let id = trolley_db::create_alert(
        &state.pool,
        &trolley_db::NewAlert {
            user_id: request.user_id,
            product_id: request.product_id,
            alert_type,
            threshold_price: request.threshold_price,
            notify_any_drop: request.notify_any_drop.unwrap_or(true),
            notify_special: request.notify_special.unwrap_or(true),
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let row = trolley_db::get_alert(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: alert_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// One alert by id.
pub(super) async fn get_alert(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(alert_id): Path<i64>,
) -> Result<Json<ApiResponse<AlertItem>>, ApiError> {
    let row = trolley_db::get_alert(&state.pool, alert_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "alert"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: alert_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Partially updates an alert.
pub(super) async fn update_alert(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(alert_id): Path<i64>,
    Json(request): Json<UpdateAlertRequest>,
) -> Result<Json<ApiResponse<AlertItem>>, ApiError> {
    trolley_db::update_alert(
        &state.pool,
        alert_id,
        &trolley_db::AlertUpdate {
            threshold_price: request.threshold_price,
            notify_any_drop: request.notify_any_drop,
            notify_special: request.notify_special,
            is_active: request.is_active,
        },
    )
    .await
    .map_err(|e| match e {
        trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "alert"),
        other => map_db_error(req_id.0.clone(), &other),
    })?;

    let row = trolley_db::get_alert(&state.pool, alert_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: alert_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    pub deleted: bool,
}

/// Deletes an alert and its notifications.
pub(super) async fn delete_alert(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(alert_id): Path<i64>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    trolley_db::delete_alert(&state.pool, alert_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "alert"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: Deleted { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Lists a user's notifications.
pub(super) async fn list_notifications(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationItem>>>, ApiError> {
    let rows = trolley_db::list_notifications_for_user(
        &state.pool,
        query.user_id,
        query.unread_only.unwrap_or(false),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(notification_item).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Unread notification count for a user.
pub(super) async fn unread_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(scope): Query<UserScope>,
) -> Result<Json<ApiResponse<UnreadCount>>, ApiError> {
    let unread = trolley_db::unread_notification_count(&state.pool, scope.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: UnreadCount { unread },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Marks one notification read.
pub(super) async fn mark_read(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(notification_id): Path<i64>,
    Query(scope): Query<UserScope>,
) -> Result<Json<ApiResponse<UnreadCount>>, ApiError> {
    trolley_db::mark_notification_read(&state.pool, scope.user_id, notification_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => {
                ApiError::not_found(req_id.0.clone(), "notification")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let unread = trolley_db::unread_notification_count(&state.pool, scope.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: UnreadCount { unread },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Marks all of a user's notifications read.
pub(super) async fn mark_all_read(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(scope): Query<UserScope>,
) -> Result<Json<ApiResponse<UnreadCount>>, ApiError> {
    trolley_db::mark_all_notifications_read(&state.pool, scope.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: UnreadCount { unread: 0 },
        meta: ResponseMeta::new(req_id.0),
    }))
}

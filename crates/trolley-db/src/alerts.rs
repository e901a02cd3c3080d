//! Price-watch alerts and their notifications.
//!
//! Alerts are evaluated when a new price observation lands (the ingest
//! pipeline calls [`evaluate_alerts_for_price`] for each affected product),
//! not on a timer. Three triggers exist: a threshold crossing, any drop
//! against the last seen price, and an item going on special.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// An alert row joined with its product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
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
    pub last_notified_at: Option<DateTime<Utc>>,
    pub last_price_seen: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// A triggered-alert record joined with its alert and product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub alert_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub old_price: Option<Decimal>,
    pub new_price: Option<Decimal>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an alert.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub user_id: i64,
    pub product_id: i64,
    pub alert_type: String,
    pub threshold_price: Option<Decimal>,
    pub notify_any_drop: bool,
    pub notify_special: bool,
}

/// Partial update for an alert; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AlertUpdate {
    pub threshold_price: Option<Decimal>,
    pub notify_any_drop: Option<bool>,
    pub notify_special: Option<bool>,
    pub is_active: Option<bool>,
}

const ALERT_SELECT: &str = "SELECT a.id, a.user_id, a.product_id, p.name AS product_name, \
        p.brand AS product_brand, a.alert_type, a.threshold_price, a.notify_any_drop, \
        a.notify_special, a.is_active, a.last_notified_at, a.last_price_seen, a.created_at \
     FROM alerts a \
     JOIN products p ON p.id = a.product_id";

/// Creates an alert and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including an unknown
/// user or product id, surfaced as a foreign-key violation).
pub async fn create_alert(pool: &PgPool, alert: &NewAlert) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO alerts \
             (user_id, product_id, alert_type, threshold_price, notify_any_drop, notify_special) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(alert.user_id)
    .bind(alert.product_id)
    .bind(&alert.alert_type)
    .bind(alert.threshold_price)
    .bind(alert.notify_any_drop)
    .bind(alert.notify_special)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetches one alert with product context.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_alert(pool: &PgPool, id: i64) -> Result<AlertRow, DbError> {
    let sql = format!("{ALERT_SELECT} WHERE a.id = $1");

    let row = sqlx::query_as::<_, AlertRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or(DbError::NotFound)
}

/// Lists a user's alerts, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts_for_user(
    pool: &PgPool,
    user_id: i64,
    active_only: bool,
) -> Result<Vec<AlertRow>, DbError> {
    let sql = format!(
        "{ALERT_SELECT} \
         WHERE a.user_id = $1 AND (NOT $2::BOOL OR a.is_active) \
         ORDER BY a.created_at DESC, a.id DESC"
    );

    let rows = sqlx::query_as::<_, AlertRow>(&sql)
        .bind(user_id)
        .bind(active_only)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Applies a partial update to an alert.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_alert(pool: &PgPool, id: i64, update: &AlertUpdate) -> Result<(), DbError> {
    let affected = sqlx::query(
        "UPDATE alerts SET \
             threshold_price = COALESCE($2, threshold_price), \
             notify_any_drop = COALESCE($3, notify_any_drop), \
             notify_special  = COALESCE($4, notify_special), \
             is_active       = COALESCE($5, is_active), \
             updated_at      = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(update.threshold_price)
    .bind(update.notify_any_drop)
    .bind(update.notify_special)
    .bind(update.is_active)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes an alert and its notification history.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_alert(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM alert_notifications WHERE alert_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let affected = sqlx::query("DELETE FROM alerts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    if affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Lists a user's notifications, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_notifications_for_user(
    pool: &PgPool,
    user_id: i64,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<NotificationRow>, DbError> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT n.id, n.alert_id, a.product_id, p.name AS product_name, \
                n.old_price, n.new_price, n.read_at, n.created_at \
         FROM alert_notifications n \
         JOIN alerts a ON a.id = n.alert_id \
         JOIN products p ON p.id = a.product_id \
         WHERE a.user_id = $1 \
           AND (NOT $2::BOOL OR n.read_at IS NULL) \
         ORDER BY n.created_at DESC, n.id DESC \
         LIMIT $3",
    )
    .bind(user_id)
    .bind(unread_only)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Number of unread notifications for a user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn unread_notification_count(pool: &PgPool, user_id: i64) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) \
         FROM alert_notifications n \
         JOIN alerts a ON a.id = n.alert_id \
         WHERE a.user_id = $1 AND n.read_at IS NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Marks one notification read, scoped to the owning user.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the notification does not exist or
/// belongs to another user, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_notification_read(
    pool: &PgPool,
    user_id: i64,
    notification_id: i64,
) -> Result<(), DbError> {
    let affected = sqlx::query(
        "UPDATE alert_notifications n SET read_at = NOW() \
         FROM alerts a \
         WHERE n.id = $2 AND a.id = n.alert_id AND a.user_id = $1 AND n.read_at IS NULL",
    )
    .bind(user_id)
    .bind(notification_id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Marks all of a user's notifications read. Returns how many changed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_all_notifications_read(pool: &PgPool, user_id: i64) -> Result<u64, DbError> {
    let affected = sqlx::query(
        "UPDATE alert_notifications n SET read_at = NOW() \
         FROM alerts a \
         WHERE a.id = n.alert_id AND a.user_id = $1 AND n.read_at IS NULL",
    )
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected)
}

/// Distinct product ids that have at least one active alert.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products_with_active_alerts(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    let ids: Vec<i64> = sqlx::query_scalar::<_, i64>(
        "SELECT DISTINCT product_id FROM alerts WHERE is_active ORDER BY product_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Evaluates all active alerts on a product against a new price observation.
///
/// An alert fires when any of its enabled conditions holds:
/// - `threshold_price` is set and the new price is at or below it;
/// - `notify_any_drop` and the new price is below the last price the alert
///   has seen;
/// - `notify_special` and the observation is flagged as a special.
///
/// Every evaluated alert has `last_price_seen` advanced to the new price,
/// fired or not, so the next drop is judged against this observation.
/// Returns the number of notifications created.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the whole evaluation
/// rolls back in that case.
pub async fn evaluate_alerts_for_price(
    pool: &PgPool,
    product_id: i64,
    price_id: i64,
    new_price: Decimal,
    is_special: bool,
) -> Result<usize, DbError> {
    let alerts = sqlx::query_as::<_, AlertRow>(&format!(
        "{ALERT_SELECT} WHERE a.product_id = $1 AND a.is_active"
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    if alerts.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut fired = 0usize;

    for alert in &alerts {
        let threshold_hit = alert
            .threshold_price
            .is_some_and(|threshold| new_price <= threshold);
        let drop_hit = alert.notify_any_drop
            && alert.last_price_seen.is_some_and(|last| new_price < last);
        let special_hit = alert.notify_special && is_special;

        let triggered = threshold_hit || drop_hit || special_hit;

        if triggered {
            sqlx::query(
                "INSERT INTO alert_notifications (alert_id, price_id, old_price, new_price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(alert.id)
            .bind(price_id)
            .bind(alert.last_price_seen)
            .bind(new_price)
            .execute(&mut *tx)
            .await?;
            fired += 1;
        }

        sqlx::query(
            "UPDATE alerts SET \
                 last_price_seen  = $2, \
                 last_notified_at = CASE WHEN $3::BOOL THEN NOW() ELSE last_notified_at END, \
                 updated_at       = NOW() \
             WHERE id = $1",
        )
        .bind(alert.id)
        .bind(new_price)
        .bind(triggered)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(fired)
}

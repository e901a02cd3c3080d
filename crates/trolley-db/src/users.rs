//! Database operations for the `users` table.
//!
//! Users exist to own alerts. Tier is a plain flag; billing is handled
//! outside this service.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Creates a user, or refreshes the display name if the email already exists.
/// Returns the user id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    display_name: Option<&str>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, display_name) \
         VALUES ($1, $2) \
         ON CONFLICT (email) DO UPDATE SET \
             display_name = COALESCE(EXCLUDED.display_name, users.display_name) \
         RETURNING id",
    )
    .bind(email)
    .bind(display_name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetches a user by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the id is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_user(pool: &PgPool, id: i64) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, display_name, is_premium, is_active, created_at \
         FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Fetches a user by email.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the email is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, display_name, is_premium, is_active, created_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

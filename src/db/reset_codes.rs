use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::ResetCode;

/// Insert or supersede the single active code for `email`.
pub async fn upsert(
    pool: &PgPool,
    email: &str,
    code_hash: &str,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<ResetCode, sqlx::Error> {
    sqlx::query_as::<_, ResetCode>(
        "INSERT INTO reset_codes (email, code_hash, created_at, expires_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO UPDATE
         SET code_hash = EXCLUDED.code_hash,
             created_at = EXCLUDED.created_at,
             expires_at = EXCLUDED.expires_at
         RETURNING *",
    )
    .bind(email)
    .bind(code_hash)
    .bind(created_at)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email_and_hash(
    pool: &PgPool,
    email: &str,
    code_hash: &str,
) -> Result<Option<ResetCode>, sqlx::Error> {
    sqlx::query_as::<_, ResetCode>(
        "SELECT * FROM reset_codes WHERE email = $1 AND code_hash = $2",
    )
    .bind(email)
    .bind(code_hash)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reset_codes WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

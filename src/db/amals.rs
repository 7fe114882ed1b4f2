use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Amal;

/// Upper bound on rows returned by a single listing.
pub const LIST_CAP: i64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct NewAmal {
    pub name: String,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub repeat_daily: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AmalChanges {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub repeat_daily: Option<bool>,
    pub completed: Option<bool>,
}

pub async fn create(pool: &PgPool, user_id: Uuid, new: &NewAmal) -> Result<Amal, sqlx::Error> {
    sqlx::query_as::<_, Amal>(
        "INSERT INTO amals (id, user_id, name, notes, scheduled_date, scheduled_time, repeat_daily, completed)
         VALUES ($1, $2, $3, $4, $5, $6, $7, false) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(&new.name)
    .bind(new.notes.as_deref())
    .bind(new.scheduled_date)
    .bind(new.scheduled_time.as_deref())
    .bind(new.repeat_daily)
    .fetch_one(pool)
    .await
}

/// All of the user's amals, or only those scheduled on `date`.
pub async fn list(
    pool: &PgPool,
    user_id: Uuid,
    date: Option<NaiveDate>,
) -> Result<Vec<Amal>, sqlx::Error> {
    sqlx::query_as::<_, Amal>(
        "SELECT * FROM amals
         WHERE user_id = $1 AND ($2::date IS NULL OR scheduled_date = $2)
         ORDER BY created_at ASC
         LIMIT $3",
    )
    .bind(user_id)
    .bind(date)
    .bind(LIST_CAP)
    .fetch_all(pool)
    .await
}

/// `None` when no amal with `id` belongs to `user_id`.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    changes: &AmalChanges,
) -> Result<Option<Amal>, sqlx::Error> {
    sqlx::query_as::<_, Amal>(
        "UPDATE amals SET
            name = COALESCE($3, name),
            notes = COALESCE($4, notes),
            scheduled_date = COALESCE($5, scheduled_date),
            scheduled_time = COALESCE($6, scheduled_time),
            repeat_daily = COALESCE($7, repeat_daily),
            completed = COALESCE($8, completed)
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(changes.name.as_deref())
    .bind(changes.notes.as_deref())
    .bind(changes.scheduled_date)
    .bind(changes.scheduled_time.as_deref())
    .bind(changes.repeat_daily)
    .bind(changes.completed)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row owned by `user_id` was removed.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM amals WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

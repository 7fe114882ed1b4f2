use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::DailyNote;

#[derive(Debug, Clone, Deserialize)]
pub struct NoteFields {
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub reflections: Option<String>,
}

/// One note per (user, date): a second write for the same date overwrites
/// `notes`/`reflections` on the existing row, keeping its id and created_at.
pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    fields: &NoteFields,
) -> Result<DailyNote, sqlx::Error> {
    sqlx::query_as::<_, DailyNote>(
        "INSERT INTO daily_notes (id, user_id, date, notes, reflections)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id, date) DO UPDATE
         SET notes = EXCLUDED.notes,
             reflections = EXCLUDED.reflections
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(fields.date)
    .bind(fields.notes.as_deref())
    .bind(fields.reflections.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn find_by_date(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DailyNote>, sqlx::Error> {
    sqlx::query_as::<_, DailyNote>("SELECT * FROM daily_notes WHERE user_id = $1 AND date = $2")
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await
}

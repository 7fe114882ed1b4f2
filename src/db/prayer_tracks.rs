use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PrayerTrack;

#[derive(Debug, Clone, Deserialize)]
pub struct TrackFields {
    pub date: NaiveDate,
    #[serde(default)]
    pub subuh: bool,
    #[serde(default)]
    pub dzuhur: bool,
    #[serde(default)]
    pub ashar: bool,
    #[serde(default)]
    pub maghrib: bool,
    #[serde(default)]
    pub isya: bool,
}

/// Same contract as `daily_notes::upsert`: all five marks are replaced.
pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    fields: &TrackFields,
) -> Result<PrayerTrack, sqlx::Error> {
    sqlx::query_as::<_, PrayerTrack>(
        "INSERT INTO prayer_tracks (id, user_id, date, subuh, dzuhur, ashar, maghrib, isya)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (user_id, date) DO UPDATE
         SET subuh = EXCLUDED.subuh,
             dzuhur = EXCLUDED.dzuhur,
             ashar = EXCLUDED.ashar,
             maghrib = EXCLUDED.maghrib,
             isya = EXCLUDED.isya
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(fields.date)
    .bind(fields.subuh)
    .bind(fields.dzuhur)
    .bind(fields.ashar)
    .bind(fields.maghrib)
    .bind(fields.isya)
    .fetch_one(pool)
    .await
}

pub async fn find_by_date(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<PrayerTrack>, sqlx::Error> {
    sqlx::query_as::<_, PrayerTrack>(
        "SELECT * FROM prayer_tracks WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Rows for the user whose date falls in `[from, to]`, oldest first.
pub async fn list_between(
    pool: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PrayerTrack>, sqlx::Error> {
    sqlx::query_as::<_, PrayerTrack>(
        "SELECT * FROM prayer_tracks
         WHERE user_id = $1 AND date BETWEEN $2 AND $3
         ORDER BY date ASC",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

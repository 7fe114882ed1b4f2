use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::daily_notes::NoteFields;
use crate::db::prayer_tracks::TrackFields;
use crate::error::AppError;
use crate::models::{DailyNote, PrayerTrack};
use crate::state::SharedState;
use crate::stats::{self, WeeklyStats};

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("date must be formatted as YYYY-MM-DD".to_string()))
}

pub async fn upsert_note(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<NoteFields>,
) -> Result<Json<DailyNote>, AppError> {
    let note = db::daily_notes::upsert(&state.pool, auth.id(), &req).await?;
    Ok(Json(note))
}

/// `null` when the user has no note for that day.
pub async fn get_note(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(date): Path<String>,
) -> Result<Json<Option<DailyNote>>, AppError> {
    let date = parse_date(&date)?;
    let note = db::daily_notes::find_by_date(&state.pool, auth.id(), date).await?;
    Ok(Json(note))
}

pub async fn upsert_track(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<TrackFields>,
) -> Result<Json<PrayerTrack>, AppError> {
    let track = db::prayer_tracks::upsert(&state.pool, auth.id(), &req).await?;
    Ok(Json(track))
}

pub async fn get_track(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(date): Path<String>,
) -> Result<Json<Option<PrayerTrack>>, AppError> {
    let date = parse_date(&date)?;
    let track = db::prayer_tracks::find_by_date(&state.pool, auth.id(), date).await?;
    Ok(Json(track))
}

pub async fn weekly_stats(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<WeeklyStats>, AppError> {
    let weekly = stats::weekly_prayer_stats(&state.pool, auth.id(), stats::server_today()).await?;
    Ok(Json(weekly))
}

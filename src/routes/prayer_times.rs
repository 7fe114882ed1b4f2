use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::prayer_times::{
    DailyTimings, Location, ProviderError, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_METHOD,
};
use crate::stats::server_today;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub method: Option<u8>,
}

#[derive(Deserialize)]
pub struct ConvertQuery {
    /// DD-MM-YYYY
    pub date: String,
}

#[derive(Deserialize)]
pub struct HijriCalendarQuery {
    pub year: i32,
    pub month: u32,
}

fn upstream(e: ProviderError) -> AppError {
    AppError::UpstreamUnavailable(e.message)
}

fn validate_month(month: u32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }
    Ok(())
}

pub async fn daily(
    State(state): State<SharedState>,
    Query(location): Query<Location>,
) -> Result<Json<DailyTimings>, AppError> {
    location.validate().map_err(AppError::BadRequest)?;

    let timings = state
        .prayer_times
        .daily(server_today(), &location)
        .await
        .map_err(upstream)?;
    Ok(Json(timings))
}

pub async fn monthly(
    State(state): State<SharedState>,
    Query(q): Query<MonthlyQuery>,
) -> Result<Json<Value>, AppError> {
    let today = server_today();
    let year = q.year.unwrap_or(today.year());
    let month = q.month.unwrap_or(today.month());
    validate_month(month)?;

    let location = Location {
        latitude: q.latitude.unwrap_or(DEFAULT_LATITUDE),
        longitude: q.longitude.unwrap_or(DEFAULT_LONGITUDE),
        method: q.method.unwrap_or(DEFAULT_METHOD),
    };
    location.validate().map_err(AppError::BadRequest)?;

    let calendar = state
        .prayer_times
        .monthly(year, month, &location)
        .await
        .map_err(upstream)?;
    Ok(Json(calendar))
}

pub async fn hijri_today(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    let hijri = state.prayer_times.hijri_today().await.map_err(upstream)?;
    Ok(Json(hijri))
}

pub async fn hijri_convert(
    State(state): State<SharedState>,
    Query(q): Query<ConvertQuery>,
) -> Result<Json<Value>, AppError> {
    let date = NaiveDate::parse_from_str(q.date.trim(), "%d-%m-%Y")
        .map_err(|_| AppError::BadRequest("date must be formatted as DD-MM-YYYY".to_string()))?;

    let hijri = state
        .prayer_times
        .hijri_convert(date)
        .await
        .map_err(upstream)?;
    Ok(Json(hijri))
}

pub async fn hijri_calendar(
    State(state): State<SharedState>,
    Query(q): Query<HijriCalendarQuery>,
) -> Result<Json<Value>, AppError> {
    validate_month(q.month)?;

    let calendar = state
        .prayer_times
        .hijri_calendar(q.year, q.month)
        .await
        .map_err(upstream)?;
    Ok(Json(calendar))
}

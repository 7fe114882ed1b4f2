use std::sync::LazyLock;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::amals::{AmalChanges, NewAmal};
use crate::error::AppError;
use crate::models::Amal;
use crate::state::SharedState;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

#[derive(Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}

fn validate_time(time: Option<&str>) -> Result<(), AppError> {
    match time {
        Some(t) if !TIME_RE.is_match(t) => Err(AppError::BadRequest(
            "scheduled_time must be formatted as HH:MM".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Ids that are not UUIDs cannot match any row, so they are simply not found.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Amal not found".to_string()))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<NewAmal>,
) -> Result<Json<Amal>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    validate_time(req.scheduled_time.as_deref())?;

    let amal = db::amals::create(&state.pool, auth.id(), &req).await?;
    Ok(Json(amal))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Amal>>, AppError> {
    let amals = db::amals::list(&state.pool, auth.id(), q.date).await?;
    Ok(Json(amals))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<AmalChanges>,
) -> Result<Json<Amal>, AppError> {
    let id = parse_id(&id)?;
    if matches!(req.name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    validate_time(req.scheduled_time.as_deref())?;

    let amal = db::amals::update(&state.pool, id, auth.id(), &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Amal not found".to_string()))?;
    Ok(Json(amal))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    if !db::amals::delete(&state.pool, id, auth.id()).await? {
        return Err(AppError::NotFound("Amal not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Amal deleted successfully" })))
}

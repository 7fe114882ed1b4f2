pub mod amals;
pub mod auth;
pub mod daily_records;
pub mod prayer_times;
pub mod users;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/", get(root))
        .route("/api/health", get(health))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        // Profile
        .route("/api/user/me", get(users::me).put(users::update_me))
        // Prayer times & Hijri calendar
        .route("/api/prayer-times", get(prayer_times::daily))
        .route("/api/prayer-times/monthly", get(prayer_times::monthly))
        .route("/api/hijri/today", get(prayer_times::hijri_today))
        .route("/api/hijri/convert", get(prayer_times::hijri_convert))
        .route("/api/hijri/calendar", get(prayer_times::hijri_calendar))
        // Amal
        .route("/api/amal", get(amals::list).post(amals::create))
        .route("/api/amal/{id}", put(amals::update).delete(amals::delete))
        // Daily notes
        .route("/api/daily-notes", post(daily_records::upsert_note))
        .route("/api/daily-notes/{date}", get(daily_records::get_note))
        // Prayer tracking
        .route("/api/prayer-track", post(daily_records::upsert_track))
        .route("/api/prayer-track/{date}", get(daily_records::get_track))
        .route(
            "/api/prayer-track/stats/weekly",
            get(daily_records::weekly_stats),
        )
}

async fn root() -> Json<Value> {
    Json(json!({ "message": format!("IbadahKu API v{}", env!("CARGO_PKG_VERSION")) }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod prayer_times;
pub mod rate_limit;
pub mod recovery;
pub mod routes;
pub mod state;
pub mod stats;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::{Mailer, SmtpMailer};
use crate::prayer_times::aladhan::AladhanClient;
use crate::prayer_times::PrayerTimeProvider;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

/// Wires the production collaborators (SMTP mailer, Aladhan client) and
/// returns the router together with the shared state it serves.
pub fn build_app(pool: PgPool, config: Config) -> Result<(Router, SharedState), String> {
    let mailer: Option<Arc<dyn Mailer>> = config.smtp.as_ref().and_then(|smtp| {
        match SmtpMailer::new(smtp) {
            Ok(mailer) => {
                tracing::info!("SMTP configured");
                Some(Arc::new(mailer) as Arc<dyn Mailer>)
            }
            Err(e) => {
                tracing::warn!("SMTP not available: {e}");
                None
            }
        }
    });

    if mailer.is_none() {
        tracing::warn!("No mailer: reset codes will be returned in API responses");
    }

    let prayer_times: Arc<dyn PrayerTimeProvider> = Arc::new(AladhanClient::new(&config.prayer_api)?);

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        mailer,
        prayer_times,
        login_limiter: LoginRateLimiter::new(),
    });

    Ok((router(state.clone()), state))
}

pub fn router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = RequestBodyLimitLayer::new(state.config.max_body_size);

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> &'static str {
    "ok"
}

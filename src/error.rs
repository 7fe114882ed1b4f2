use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Externally visible failure kinds. Finer causes are logged where they
/// happen and collapsed into one of these before reaching the client.
#[derive(Debug)]
pub enum AppError {
    DuplicateEmail,
    InvalidCredentials,
    Unauthorized,
    InvalidCode,
    ExpiredCode,
    NotFound(String),
    UpstreamUnavailable(String),
    BadRequest(String),
    RateLimited(String),
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DuplicateEmail => write!(f, "Email already registered"),
            AppError::InvalidCredentials => write!(f, "Incorrect email or password"),
            AppError::Unauthorized => write!(f, "Could not validate credentials"),
            AppError::InvalidCode => write!(f, "Invalid reset code"),
            AppError::ExpiredCode => {
                write!(f, "Reset code has expired. Please request a new one.")
            }
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::UpstreamUnavailable(msg) => write!(f, "Upstream Unavailable: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidCode | AppError::ExpiredCode | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::RateLimited(msg) => {
                msg.clone()
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream failure: {msg}");
                "Upstream service unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, axum::Json(json!({ "error": message }))).into_response();
        if matches!(self, AppError::Unauthorized) {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

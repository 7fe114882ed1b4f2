use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::accounts;
use crate::auth::jwt;
use crate::error::AppError;
use crate::models::User;
use crate::recovery::{self, ForgotPasswordResponse};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn session_for(state: &SharedState, user: User) -> Result<Json<AuthResponse>, AppError> {
    let access_token =
        jwt::issue(user.id, state.token_ttl(), &state.config.jwt_secret).map_err(AppError::Internal)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();
    let full_name = req.full_name.trim();

    if email.is_empty() || req.password.is_empty() || full_name.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    if !accounts::is_valid_email(email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    accounts::validate_password(&req.password)?;

    let user = accounts::register(&state.pool, email, &req.password, full_name).await?;
    session_for(&state, user)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();

    if state.login_limiter.check(email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = match accounts::authenticate(&state.pool, email, &req.password).await {
        Ok(user) => user,
        Err(AppError::InvalidCredentials) => {
            state.login_limiter.record_failure(email);
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => return Err(e),
    };

    state.login_limiter.reset(email);
    tracing::info!(user_id = %user.id, "User logged in");
    session_for(&state, user)
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let response =
        recovery::forgot_password(&state.pool, state.mailer.as_deref(), req.email.trim()).await?;
    Ok(Json(response))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    accounts::validate_password(&req.new_password)?;

    recovery::reset_password(
        &state.pool,
        req.email.trim(),
        &req.code,
        &req.new_password,
        Utc::now(),
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

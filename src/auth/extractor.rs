use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

/// The live account behind a valid bearer token.
///
/// Every failure (missing header, bad or expired token, deleted account)
/// becomes the same `AppError::Unauthorized`; the cause is only logged.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    tracing::debug!("Rejected request without bearer token: {e}");
                    AppError::Unauthorized
                })?;

        let user_id = jwt::validate(bearer.token(), &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected session token: {e}");
            AppError::Unauthorized
        })?;

        let user = db::users::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Valid token for missing user {user_id}");
                AppError::Unauthorized
            })?;

        Ok(AuthUser(user))
    }
}

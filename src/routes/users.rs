use axum::extract::State;
use axum::Json;

use crate::accounts;
use crate::auth::extractor::AuthUser;
use crate::db::users::ProfileChanges;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

pub async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<User>, AppError> {
    let updated = accounts::update_profile(&state.pool, &user, &changes).await?;
    Ok(Json(updated))
}

use std::sync::LazyLock;

use regex::Regex;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::db::users::ProfileChanges;
use crate::error::AppError;
use crate::models::User;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Verified against on unknown emails so a miss costs as much as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| password::hash("ibadahku-unknown-account").ok());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Creates the account. The unique index on `users.email` is the real guard;
/// the lookup only spares a hash computation in the common case.
pub async fn register(
    pool: &PgPool,
    email: &str,
    plain_password: &str,
    full_name: &str,
) -> Result<User, AppError> {
    if db::users::find_by_email(pool, email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let pw_hash = password::hash(plain_password).map_err(AppError::Internal)?;

    let user = db::users::create(pool, Uuid::now_v7(), email, &pw_hash, full_name)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEmail
            }
            _ => AppError::Database(e),
        })?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Unknown email and wrong password fail identically.
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    plain_password: &str,
) -> Result<User, AppError> {
    let Some(user) = db::users::find_by_email(pool, email).await? else {
        tracing::debug!("Login attempt for unknown email");
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = password::verify(plain_password, dummy);
        }
        return Err(AppError::InvalidCredentials);
    };

    let valid = password::verify(plain_password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

/// Merges only the supplied fields; nothing supplied means nothing written.
pub async fn update_profile(
    pool: &PgPool,
    current: &User,
    changes: &ProfileChanges,
) -> Result<User, AppError> {
    if changes.is_empty() {
        return Ok(current.clone());
    }

    if matches!(changes.full_name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::BadRequest("Full name cannot be empty".to_string()));
    }

    db::users::update_profile(pool, current.id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Replaces the password hash. Already issued session tokens stay valid
/// until they expire.
pub async fn set_password(pool: &PgPool, email: &str, new_password: &str) -> Result<(), AppError> {
    let pw_hash = password::hash(new_password).map_err(AppError::Internal)?;
    let updated = db::users::update_password_by_email(pool, email, &pw_hash).await?;
    if updated == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}

//! Password reset codes.
//!
//! A code is active from `forgot_password` until it is consumed by a
//! successful reset, superseded by a newer request, or found expired by a
//! reset attempt (expiry is lazy: nothing sweeps the table).

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts;
use crate::db;
use crate::email::{self, Mailer};
use crate::error::AppError;

pub const RESET_CODE_TTL_MINUTES: i64 = 15;
pub const RESET_CODE_LEN: usize = 6;
const MAIL_TIMEOUT: StdDuration = StdDuration::from_secs(15);

/// Six uppercase characters taken from a random UUID.
pub fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()[..RESET_CODE_LEN].to_uppercase()
}

/// Codes are stored hashed and matched exactly as issued.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, PartialEq)]
pub enum IssueOutcome {
    UnknownEmail,
    Issued(String),
}

/// Creates (or supersedes) the active code for a registered email.
pub async fn issue_code(
    pool: &PgPool,
    email: &str,
    now: DateTime<Utc>,
) -> Result<IssueOutcome, AppError> {
    if db::users::find_by_email(pool, email).await?.is_none() {
        return Ok(IssueOutcome::UnknownEmail);
    }

    let code = generate_code();
    let expires_at = now + Duration::minutes(RESET_CODE_TTL_MINUTES);
    db::reset_codes::upsert(pool, email, &hash_code(&code), now, expires_at).await?;

    Ok(IssueOutcome::Issued(code))
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Issues a code and mails it. When mail is unavailable the code is handed
/// back in the response instead; the request itself still succeeds.
pub async fn forgot_password(
    pool: &PgPool,
    mailer: Option<&dyn Mailer>,
    email: &str,
) -> Result<ForgotPasswordResponse, AppError> {
    let code = match issue_code(pool, email, Utc::now()).await? {
        IssueOutcome::UnknownEmail => {
            return Ok(ForgotPasswordResponse {
                message: "If the email is registered, a reset code has been sent".to_string(),
                email_sent: false,
                code: None,
            });
        }
        IssueOutcome::Issued(code) => code,
    };

    let delivery = match mailer {
        Some(mailer) => {
            match tokio::time::timeout(MAIL_TIMEOUT, email::send_reset_code(mailer, email, &code))
                .await
            {
                Ok(result) => result,
                Err(_) => Err("Timed out sending reset email".to_string()),
            }
        }
        None => Err("No mailer configured".to_string()),
    };

    match delivery {
        Ok(()) => {
            tracing::info!("Password reset code sent");
            Ok(ForgotPasswordResponse {
                message: "A reset code has been sent to your email".to_string(),
                email_sent: true,
                code: None,
            })
        }
        Err(e) => {
            tracing::warn!("Reset email not delivered, returning code in response: {e}");
            Ok(ForgotPasswordResponse {
                message: "Email could not be sent. Use the following code:".to_string(),
                email_sent: false,
                code: Some(code),
            })
        }
    }
}

/// Consumes a live code and sets the new password.
///
/// Fails with `InvalidCode` when no active code matches `(email, code)` and
/// with `ExpiredCode` (deleting the row) when the match is past its expiry.
pub async fn reset_password(
    pool: &PgPool,
    email: &str,
    code: &str,
    new_password: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let record = db::reset_codes::find_by_email_and_hash(pool, email, &hash_code(code))
        .await?
        .ok_or(AppError::InvalidCode)?;

    if record.is_expired_at(now) {
        db::reset_codes::delete(pool, email).await?;
        return Err(AppError::ExpiredCode);
    }

    accounts::set_password(pool, email, new_password).await?;
    db::reset_codes::delete(pool, email).await?;

    tracing::info!("Password reset completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResetCode;

    #[test]
    fn generated_codes_are_six_uppercase_chars() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), RESET_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn code_hash_is_exact() {
        assert_eq!(hash_code("ABC123"), hash_code("ABC123"));
        assert_ne!(hash_code("abc123"), hash_code("ABC123"));
        assert_ne!(hash_code(" ABC123"), hash_code("ABC123"));
        assert_ne!(hash_code("ABC123"), hash_code("ABC124"));
        assert_eq!(hash_code("ABC123").len(), 64);
    }

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        let record = ResetCode {
            email: "a@b.co".to_string(),
            code_hash: hash_code("ABC123"),
            created_at: now,
            expires_at: now + Duration::minutes(RESET_CODE_TTL_MINUTES),
        };
        assert!(!record.is_expired_at(now + Duration::minutes(14)));
        assert!(record.is_expired_at(now + Duration::minutes(15)));
        assert!(record.is_expired_at(now + Duration::minutes(16)));
    }

    #[test]
    fn fallback_response_includes_code_only_when_set() {
        let with_code = serde_json::to_value(ForgotPasswordResponse {
            message: "m".into(),
            email_sent: false,
            code: Some("ABC123".into()),
        })
        .unwrap();
        assert_eq!(with_code["code"], "ABC123");

        let without = serde_json::to_value(ForgotPasswordResponse {
            message: "m".into(),
            email_sent: true,
            code: None,
        })
        .unwrap();
        assert!(without.get("code").is_none());
    }
}

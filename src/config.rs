use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub token_ttl_days: i64,
    pub cors_origins: Vec<String>,
    pub max_body_size: usize,
    pub log_level: String,
    pub prayer_api: PrayerApiConfig,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct PrayerApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PrayerApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.aladhan.com/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("IBADAHKU_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid IBADAHKU_HOST: {e}"))?;

        let port: u16 = env_or("IBADAHKU_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid IBADAHKU_PORT: {e}"))?;

        let token_ttl_days: i64 = env_or("TOKEN_TTL_DAYS", "7")
            .parse()
            .map_err(|e| format!("Invalid TOKEN_TTL_DAYS: {e}"))?;
        if token_ttl_days <= 0 {
            return Err("TOKEN_TTL_DAYS must be positive".to_string());
        }

        let cors_origins = parse_origins(&env_or("CORS_ORIGINS", "*"));

        let max_body_size: usize = env_or("IBADAHKU_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid IBADAHKU_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("LOG_LEVEL", "info");

        let defaults = PrayerApiConfig::default();
        let prayer_api = PrayerApiConfig {
            base_url: env_or("PRAYER_API_BASE_URL", &defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: env_or("PRAYER_API_TIMEOUT_SECS", &defaults.timeout_secs.to_string())
                .parse()
                .map_err(|e| format!("Invalid PRAYER_API_TIMEOUT_SECS: {e}"))?,
        };

        let smtp = match (
            std::env::var("IBADAHKU_SMTP_HOST").ok(),
            std::env::var("IBADAHKU_SMTP_PORT").ok(),
            std::env::var("IBADAHKU_SMTP_USER").ok(),
            std::env::var("IBADAHKU_SMTP_PASS").ok(),
            std::env::var("IBADAHKU_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid IBADAHKU_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            token_ttl_days,
            cors_origins,
            max_body_size,
            log_level,
            prayer_api,
            smtp,
        })
    }
}

/// Comma separated list; `*` anywhere means any origin and yields an empty list.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origin_means_any() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("https://a.example, *").is_empty());
    }

    #[test]
    fn explicit_origins_are_trimmed() {
        assert_eq!(
            parse_origins(" https://a.example ,https://b.example,,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}

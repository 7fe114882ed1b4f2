use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::prayer_times::PrayerTimeProvider;
use crate::rate_limit::LoginRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub prayer_times: Arc<dyn PrayerTimeProvider>,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.config.token_ttl_days)
    }
}

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use ibadahku::config::{Config, PrayerApiConfig};
use ibadahku::email::Mailer;
use ibadahku::prayer_times::{
    DailyTimings, DateInfo, Location, PrayerTimeProvider, ProviderError, Timings,
};
use ibadahku::rate_limit::LoginRateLimiter;
use ibadahku::state::{AppState, SharedState};

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

// ── Doubles ─────────────────────────────────────────────────────

/// Canned prayer times; `down` makes every lookup fail like an unreachable API.
#[derive(Default)]
pub struct FakePrayerTimes {
    pub down: bool,
}

impl FakePrayerTimes {
    fn check(&self) -> Result<(), ProviderError> {
        if self.down {
            return Err("connection refused".into());
        }
        Ok(())
    }
}

#[async_trait]
impl PrayerTimeProvider for FakePrayerTimes {
    async fn daily(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<DailyTimings, ProviderError> {
        self.check()?;
        Ok(DailyTimings {
            timings: Timings {
                subuh: "04:35".to_string(),
                terbit: "05:52".to_string(),
                dzuhur: "11:55".to_string(),
                ashar: "15:15".to_string(),
                maghrib: "17:55".to_string(),
                isya: "19:07".to_string(),
            },
            date: DateInfo {
                gregorian: json!({ "date": date.format("%d-%m-%Y").to_string() }),
                hijri: json!({ "method": location.method }),
            },
        })
    }

    async fn monthly(
        &self,
        year: i32,
        month: u32,
        location: &Location,
    ) -> Result<Value, ProviderError> {
        self.check()?;
        Ok(json!({
            "year": year,
            "month": month,
            "latitude": location.latitude,
            "longitude": location.longitude,
        }))
    }

    async fn hijri_today(&self) -> Result<Value, ProviderError> {
        self.check()?;
        Ok(json!({ "hijri": { "day": "1", "month": { "en": "Ramaḍān" }, "year": "1447" } }))
    }

    async fn hijri_convert(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        self.check()?;
        Ok(json!({ "gregorian": date.format("%d-%m-%Y").to_string() }))
    }

    async fn hijri_calendar(&self, year: i32, month: u32) -> Result<Value, ProviderError> {
        self.check()?;
        Ok(json!([{ "hijri": { "year": year, "month": month } }]))
    }
}

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct CapturingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl CapturingMailer {
    pub fn sent_to(&self, email: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == email)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, to: &str, _subject: &str, html_body: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), html_body.to_string()));
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), String> {
        Err("SMTP relay refused connection".to_string())
    }
}

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        token_ttl_days: 7,
        cors_origins: vec![],
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        prayer_api: PrayerApiConfig::default(),
        smtp: None,
    }
}

pub fn test_state(
    pool: PgPool,
    config: Config,
    mailer: Option<Arc<dyn Mailer>>,
    prayer_times: FakePrayerTimes,
) -> SharedState {
    Arc::new(AppState {
        pool,
        config,
        mailer,
        prayer_times: Arc::new(prayer_times),
        login_limiter: LoginRateLimiter::new(),
    })
}

// ── Test server ─────────────────────────────────────────────────

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> (Value, StatusCode) {
        let resp = req.send().await.expect("request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> (Value, StatusCode) {
        self.send(
            self.client
                .post(self.url("/api/auth/register"))
                .json(&json!({ "email": email, "password": password, "full_name": full_name })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        self.send(
            self.client
                .post(self.url("/api/auth/login"))
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register a user and return its access token.
    pub async fn signup(&self, email: &str) -> String {
        let (body, status) = self.register(email, "password123", "Hamba Allah").await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.url(path))).await
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        self.send(self.client.get(self.url(path)).bearer_auth(token))
            .await
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.post(self.url(path)).bearer_auth(token).json(body))
            .await
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        self.send(self.client.put(self.url(path)).bearer_auth(token).json(body))
            .await
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        self.send(self.client.delete(self.url(path)).bearer_auth(token))
            .await
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database and no mailer.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_mailer(None).await
}

pub async fn spawn_app_with_mailer(mailer: Option<Arc<dyn Mailer>>) -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("ibadahku_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let state = test_state(
        pool.clone(),
        test_config(test_url),
        mailer,
        FakePrayerTimes::default(),
    );
    let app = ibadahku::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::{DailyTimings, DateInfo, Location, PrayerTimeProvider, ProviderError, Timings};
use crate::config::PrayerApiConfig;

/// Client for the public Aladhan API (https://aladhan.com/prayer-times-api).
pub struct AladhanClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Envelope {
    code: u16,
    #[serde(default)]
    status: Value,
    #[serde(default)]
    data: Value,
}

impl AladhanClient {
    pub fn new(config: &PrayerApiConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::from(format!("Request to {path} failed: {e}")))?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::from(format!("Invalid JSON from {path}: {e}")))?;

        unwrap_envelope(body)
    }
}

fn location_query(location: &Location) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("method", location.method.to_string()),
    ]
}

/// Aladhan wraps every payload in `{code, status, data}`; anything but code 200 is a failure.
pub fn unwrap_envelope(body: Value) -> Result<Value, ProviderError> {
    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| ProviderError::from(format!("Unexpected response shape: {e}")))?;

    if envelope.code != 200 {
        return Err(ProviderError::from(format!(
            "Provider answered code {}: {}",
            envelope.code, envelope.status
        )));
    }
    Ok(envelope.data)
}

pub fn daily_from_data(data: &Value) -> Result<DailyTimings, ProviderError> {
    let t = &data["timings"];
    let field = |name: &str| -> Result<String, ProviderError> {
        t[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::from(format!("Missing timing {name}")))
    };

    let date = &data["date"];
    if date["gregorian"].is_null() || date["hijri"].is_null() {
        return Err(ProviderError::from("Missing date info"));
    }

    Ok(DailyTimings {
        timings: Timings {
            subuh: field("Fajr")?,
            terbit: field("Sunrise")?,
            dzuhur: field("Dhuhr")?,
            ashar: field("Asr")?,
            maghrib: field("Maghrib")?,
            isya: field("Isha")?,
        },
        date: DateInfo {
            gregorian: date["gregorian"].clone(),
            hijri: date["hijri"].clone(),
        },
    })
}

fn hijri_from_data(data: Value) -> Result<Value, ProviderError> {
    match data.get("hijri") {
        Some(hijri) => Ok(hijri.clone()),
        None => Err(ProviderError::from("Missing hijri date")),
    }
}

#[async_trait]
impl PrayerTimeProvider for AladhanClient {
    async fn daily(
        &self,
        date: NaiveDate,
        location: &Location,
    ) -> Result<DailyTimings, ProviderError> {
        let path = format!("/timings/{}", date.format("%d-%m-%Y"));
        let data = self.get(&path, &location_query(location)).await?;
        daily_from_data(&data)
    }

    async fn monthly(
        &self,
        year: i32,
        month: u32,
        location: &Location,
    ) -> Result<Value, ProviderError> {
        let path = format!("/calendar/{year}/{month}");
        self.get(&path, &location_query(location)).await
    }

    async fn hijri_today(&self) -> Result<Value, ProviderError> {
        let data = self.get("/gToH", &[]).await?;
        hijri_from_data(data)
    }

    async fn hijri_convert(&self, date: NaiveDate) -> Result<Value, ProviderError> {
        let path = format!("/gToH/{}", date.format("%d-%m-%Y"));
        let data = self.get(&path, &[]).await?;
        hijri_from_data(data)
    }

    async fn hijri_calendar(&self, year: i32, month: u32) -> Result<Value, ProviderError> {
        let path = format!("/hToGCalendar/{month}/{year}");
        self.get(&path, &[]).await
    }
}

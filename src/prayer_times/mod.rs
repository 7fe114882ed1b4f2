pub mod aladhan;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Jakarta, used when the client does not send coordinates.
pub const DEFAULT_LATITUDE: f64 = -6.2088;
pub const DEFAULT_LONGITUDE: f64 = 106.8456;
/// Kemenag (Indonesian Ministry of Religious Affairs) calculation method.
pub const DEFAULT_METHOD: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_method")]
    pub method: u8,
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_method() -> u8 {
    DEFAULT_METHOD
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            method: DEFAULT_METHOD,
        }
    }
}

impl Location {
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err("latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err("longitude must be between -180 and 180".to_string());
        }
        Ok(())
    }
}

/// Six named times of one day, keyed the way the app displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(rename = "Subuh")]
    pub subuh: String,
    #[serde(rename = "Terbit")]
    pub terbit: String,
    #[serde(rename = "Dzuhur")]
    pub dzuhur: String,
    #[serde(rename = "Ashar")]
    pub ashar: String,
    #[serde(rename = "Maghrib")]
    pub maghrib: String,
    #[serde(rename = "Isya")]
    pub isya: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateInfo {
    pub gregorian: serde_json::Value,
    pub hijri: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimings {
    pub timings: Timings,
    pub date: DateInfo,
}

#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for ProviderError {
    fn from(s: String) -> Self {
        ProviderError { message: s }
    }
}

impl From<&str> for ProviderError {
    fn from(s: &str) -> Self {
        ProviderError {
            message: s.to_string(),
        }
    }
}

/// Read-only prayer time and Hijri calendar lookups.
#[async_trait]
pub trait PrayerTimeProvider: Send + Sync {
    async fn daily(&self, date: NaiveDate, location: &Location)
        -> Result<DailyTimings, ProviderError>;

    async fn monthly(
        &self,
        year: i32,
        month: u32,
        location: &Location,
    ) -> Result<serde_json::Value, ProviderError>;

    async fn hijri_today(&self) -> Result<serde_json::Value, ProviderError>;

    async fn hijri_convert(&self, date: NaiveDate) -> Result<serde_json::Value, ProviderError>;

    async fn hijri_calendar(&self, year: i32, month: u32)
        -> Result<serde_json::Value, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_query_falls_back_to_jakarta() {
        let loc: Location = serde_json::from_str("{}").unwrap();
        assert_eq!(loc, Location::default());
        assert!(loc.validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let loc = Location {
            latitude: 91.0,
            ..Location::default()
        };
        assert!(loc.validate().is_err());
        let loc = Location {
            longitude: -181.0,
            ..Location::default()
        };
        assert!(loc.validate().is_err());
    }
}

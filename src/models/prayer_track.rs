use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PrayerTrack {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub subuh: bool,
    pub dzuhur: bool,
    pub ashar: bool,
    pub maghrib: bool,
    pub isya: bool,
}

impl PrayerTrack {
    pub const SLOTS: i64 = 5;

    /// Number of the five daily prayers marked as done.
    pub fn completed_count(&self) -> i64 {
        [self.subuh, self.dzuhur, self.ashar, self.maghrib, self.isya]
            .iter()
            .filter(|done| **done)
            .count() as i64
    }
}

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::PrayerTrack;

pub const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyStats {
    pub total: i64,
    pub completed: i64,
    pub percentage: f64,
    pub tracks: Vec<PrayerTrack>,
}

/// "Today" on the server's local clock, not the user's.
pub fn server_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Inclusive `(first, last)` dates of the trailing window ending on `today`.
pub fn window_ending(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    (first, today)
}

/// Days without a row count for nothing, neither in `total` nor in `completed`.
pub fn summarize(tracks: Vec<PrayerTrack>) -> WeeklyStats {
    let total = tracks.len() as i64 * PrayerTrack::SLOTS;
    let completed: i64 = tracks.iter().map(PrayerTrack::completed_count).sum();
    let percentage = if total > 0 {
        round_one_decimal(completed as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    WeeklyStats {
        total,
        completed,
        percentage,
        tracks,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub async fn weekly_prayer_stats(
    pool: &PgPool,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<WeeklyStats, sqlx::Error> {
    let (first, last) = window_ending(today);
    let tracks = db::prayer_tracks::list_between(pool, user_id, first, last).await?;
    Ok(summarize(tracks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(date: &str, marks: [bool; 5]) -> PrayerTrack {
        PrayerTrack {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            date: date.parse().unwrap(),
            subuh: marks[0],
            dzuhur: marks[1],
            ashar: marks[2],
            maghrib: marks[3],
            isya: marks[4],
        }
    }

    #[test]
    fn three_days_two_of_five_each() {
        let stats = summarize(vec![
            track("2025-01-08", [true, true, false, false, false]),
            track("2025-01-09", [false, true, false, true, false]),
            track("2025-01-10", [false, false, false, true, true]),
        ]);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.completed, 6);
        assert_eq!(stats.percentage, 40.0);
        assert_eq!(stats.tracks.len(), 3);
    }

    #[test]
    fn no_rows_means_zero_percent() {
        let stats = summarize(Vec::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.percentage, 0.0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        // 1 of 15 = 6.666...
        let stats = summarize(vec![
            track("2025-01-08", [true, false, false, false, false]),
            track("2025-01-09", [false; 5]),
            track("2025-01-10", [false; 5]),
        ]);
        assert_eq!(stats.percentage, 6.7);
    }

    #[test]
    fn window_is_today_and_six_prior_days() {
        let today: NaiveDate = "2025-03-02".parse().unwrap();
        let (first, last) = window_ending(today);
        assert_eq!(first, "2025-02-24".parse::<NaiveDate>().unwrap());
        assert_eq!(last, today);
    }
}

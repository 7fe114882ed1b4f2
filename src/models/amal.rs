use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Amal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub repeat_daily: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

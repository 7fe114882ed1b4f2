use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DailyNote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub reflections: Option<String>,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Feed item as shown on dashboards; `time` is humanized at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub user: String,
    pub action: String,
    pub time: String,
}

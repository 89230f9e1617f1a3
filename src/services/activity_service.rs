use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{ActivityLog, ActivityView};

const ACTIVITY_COLUMNS: &str = "id, user_name, message, timestamp";

/// Append-only activity feed.
#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
}

impl ActivityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append an entry. Takes any executor so callers can write the entry in
    /// the same transaction as the change it describes.
    pub async fn record<'e>(
        executor: impl PgExecutor<'e>,
        user_name: &str,
        message: &str,
    ) -> Result<ActivityLog, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(&format!(
            "INSERT INTO activity_logs (id, user_name, message, timestamp)
             VALUES ($1, $2, $3, $4)
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_name)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    pub async fn record_now(&self, user_name: &str, message: &str) -> Result<ActivityLog, sqlx::Error> {
        Self::record(&self.db, user_name, message).await
    }

    /// Newest entries across the whole gym.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs ORDER BY timestamp DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await
    }

    /// Newest entries attributed to any of `user_names`.
    pub async fn recent_for(
        &self,
        user_names: &[String],
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        if user_names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ActivityLog>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs
             WHERE user_name = ANY($1)
             ORDER BY timestamp DESC LIMIT $2"
        ))
        .bind(user_names)
        .bind(limit)
        .fetch_all(&self.db)
        .await
    }
}

/// Render entries for a dashboard feed.
pub fn to_views(logs: Vec<ActivityLog>, now: DateTime<Utc>) -> Vec<ActivityView> {
    logs.into_iter()
        .map(|log| ActivityView {
            time: time_ago(Some(log.timestamp), now),
            user: log.user_name,
            action: log.message,
        })
        .collect()
}

/// Humanize the distance from `then` to `now`: `3d ago`, `2h ago`, `5m ago`
/// or `just now`. Days win over hours, and the hour and minute buckets only
/// start strictly past one hour and one minute.
pub fn time_ago(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(then) = then else {
        return "never".to_string();
    };

    let diff = now - then;
    if diff.num_seconds() < 0 {
        return "just now".to_string();
    }

    let days = diff.num_days();
    if days > 0 {
        return format!("{days}d ago");
    }

    let seconds = diff.num_seconds();
    if seconds > 3600 {
        format!("{}h ago", seconds / 3600)
    } else if seconds > 60 {
        format!("{}m ago", seconds / 60)
    } else {
        "just now".to_string()
    }
}

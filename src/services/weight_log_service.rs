use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{LogWeightRequest, WeightLog};
use crate::services::activity_service::ActivityService;
use crate::services::errors::GymError;

#[derive(Clone)]
pub struct WeightLogService {
    db: PgPool,
}

impl WeightLogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn log_weight(&self, actor: &Actor, request: LogWeightRequest) -> Result<WeightLog, GymError> {
        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        self.add_entry(actor.user_id, &actor.name, date, request.weight_lb).await
    }

    pub async fn add_entry(
        &self,
        user_id: Uuid,
        user_name: &str,
        date: NaiveDate,
        weight_lb: f64,
    ) -> Result<WeightLog, GymError> {
        if !weight_lb.is_finite() || weight_lb <= 0.0 {
            return Err(GymError::InvalidInput("Weight must be a positive number.".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let entry = sqlx::query_as::<_, WeightLog>(
            "INSERT INTO weight_logs (id, user_id, date, weight_lb)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, date, weight_lb",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(weight_lb)
        .fetch_one(&mut *tx)
        .await?;

        ActivityService::record(&mut *tx, user_name, "logged a new weight").await?;

        tx.commit().await?;
        Ok(entry)
    }

    /// Weight history, newest date first.
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<WeightLog>, sqlx::Error> {
        sqlx::query_as::<_, WeightLog>(
            "SELECT id, user_id, date, weight_lb FROM weight_logs
             WHERE user_id = $1 ORDER BY date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }
}

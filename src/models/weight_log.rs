use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub weight_lb: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogWeightRequest {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub weight_lb: f64,
}

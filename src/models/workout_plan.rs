use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub member_id: Uuid,
    pub trainer_name: String,
    pub title: String,
    pub description: String,
    pub assigned_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignPlanRequest {
    pub member_id: Uuid,
    pub title: String,
    pub description: String,
}

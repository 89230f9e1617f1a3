use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled class. `capacity` is always at least 1.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GymClass {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub day: String,
    pub time: String,
    pub duration: String,
    pub image_url: String,
    pub capacity: i32,
}

/// Class listing row with live occupancy.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassOverview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: GymClass,
    pub booked: i64,
    pub waitlisted: i64,
}

impl ClassOverview {
    pub fn seats_left(&self) -> i64 {
        (i64::from(self.class.capacity) - self.booked).max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClass {
    pub name: String,
    pub description: String,
    pub day: String,
    pub time: String,
    pub duration: String,
    pub image_url: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCapacityRequest {
    pub capacity: i32,
}

pub const DEFAULT_CLASS_CAPACITY: i32 = 3;

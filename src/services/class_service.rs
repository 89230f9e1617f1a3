use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{ClassOverview, CreateClass, GymClass, UserRole, DEFAULT_CLASS_CAPACITY};
use crate::services::activity_service::ActivityService;
use crate::services::booking_service::{fill_free_seats, lock_class};
use crate::services::errors::GymError;

const CLASS_COLUMNS: &str = "id, name, description, day, time, duration, image_url, capacity";

#[derive(Clone)]
pub struct ClassService {
    db: PgPool,
}

impl ClassService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_class(&self, class_data: CreateClass) -> Result<GymClass, GymError> {
        let capacity = class_data.capacity.unwrap_or(DEFAULT_CLASS_CAPACITY);
        validate_capacity(capacity)?;

        let class = sqlx::query_as::<_, GymClass>(&format!(
            "INSERT INTO classes (id, name, description, day, time, duration, image_url, capacity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&class_data.name)
        .bind(&class_data.description)
        .bind(&class_data.day)
        .bind(&class_data.time)
        .bind(&class_data.duration)
        .bind(&class_data.image_url)
        .bind(capacity)
        .fetch_one(&self.db)
        .await?;

        Ok(class)
    }

    pub async fn get_class(&self, class_id: Uuid) -> Result<Option<GymClass>, sqlx::Error> {
        sqlx::query_as::<_, GymClass>(&format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"))
            .bind(class_id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn get_class_by_name(&self, name: &str) -> Result<Option<GymClass>, sqlx::Error> {
        sqlx::query_as::<_, GymClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE name = $1 LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.db)
        .await
    }

    /// Every class with its current booked and waitlisted counts.
    pub async fn list_classes(&self) -> Result<Vec<ClassOverview>, sqlx::Error> {
        sqlx::query_as::<_, ClassOverview>(
            "SELECT c.id, c.name, c.description, c.day, c.time, c.duration, c.image_url, c.capacity,
                    (SELECT COUNT(*) FROM bookings b WHERE b.class_id = c.id) AS booked,
                    (SELECT COUNT(*) FROM waitlist w WHERE w.class_id = c.id) AS waitlisted
             FROM classes c
             ORDER BY c.name",
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn count_classes(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM classes")
            .fetch_one(&self.db)
            .await
    }

    /// Change a class's capacity. Lowering it below the current booked count
    /// evicts nobody; new requests queue until the class drops under the limit.
    /// Raising it seats waitlisted members, oldest first, before anyone new.
    pub async fn update_capacity(
        &self,
        actor: &Actor,
        class_id: Uuid,
        capacity: i32,
    ) -> Result<GymClass, GymError> {
        if actor.role != UserRole::Admin {
            return Err(GymError::Unauthorized);
        }
        validate_capacity(capacity)?;

        let mut tx = self.db.begin().await?;

        let locked = lock_class(&mut tx, class_id).await?;
        let class = sqlx::query_as::<_, GymClass>(&format!(
            "UPDATE classes SET capacity = $2 WHERE id = $1 RETURNING {CLASS_COLUMNS}"
        ))
        .bind(locked.id)
        .bind(capacity)
        .fetch_one(&mut *tx)
        .await?;

        ActivityService::record(
            &mut *tx,
            &actor.name,
            &format!("set capacity of '{}' to {}.", class.name, capacity),
        )
        .await?;

        let promoted = fill_free_seats(&mut tx, &class).await?;

        tx.commit().await?;

        tracing::info!(
            class_id = %class.id,
            capacity,
            promoted = promoted.len(),
            "Updated class capacity"
        );
        Ok(class)
    }
}

pub fn validate_capacity(capacity: i32) -> Result<(), GymError> {
    if capacity < 1 {
        return Err(GymError::InvalidInput(
            "Capacity must be at least 1.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(30).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(-3).is_err());
    }
}

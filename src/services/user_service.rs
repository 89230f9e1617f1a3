use chrono::Utc;
use regex::Regex;
use sqlx::PgPool;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::auth::Actor;
use crate::models::{Booking, CreateUser, User, UserRole};
use crate::services::activity_service::ActivityService;
use crate::services::booking_service::{release_seat, BOOKING_COLUMNS};
use crate::services::errors::GymError;

pub(crate) const USER_COLUMNS: &str = "id, name, email, password_hash, role, goal, created_at";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn validate_new_user(user_data: &CreateUser) -> Result<(), GymError> {
    if user_data.name.trim().is_empty() {
        return Err(GymError::InvalidInput("Name cannot be empty.".to_string()));
    }
    if !email_pattern().is_match(&user_data.email) {
        return Err(GymError::InvalidInput("Invalid email address.".to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an account. New members are put on the first trainer's roster.
    pub async fn register(&self, user_data: CreateUser) -> Result<User, GymError> {
        validate_new_user(&user_data)?;

        if self.get_user_by_email(&user_data.email).await?.is_some() {
            return Err(GymError::InvalidInput(
                "This email is already registered.".to_string(),
            ));
        }

        let password_hash = hash_password(&user_data.password)?;

        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, goal, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_data.name.trim())
        .bind(&user_data.email)
        .bind(&password_hash)
        .bind(user_data.role)
        .bind(&user_data.goal)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        if user.role == UserRole::Member {
            let trainer_id: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM users WHERE role = 'trainer' ORDER BY created_at, id LIMIT 1",
            )
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(trainer_id) = trainer_id {
                sqlx::query("INSERT INTO trainer_clients (trainer_id, client_id) VALUES ($1, $2)")
                    .bind(trainer_id)
                    .bind(user.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        ActivityService::record(
            &mut *tx,
            &user.name,
            &format!("registered as a new {}.", user.role.as_str()),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Registered user");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.db)
            .await
    }

    /// All accounts, grouped by role name then sorted by name.
    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY role::text, name"
        ))
        .fetch_all(&self.db)
        .await
    }

    pub async fn count_members(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'member'")
            .fetch_one(&self.db)
            .await
    }

    /// A trainer's roster, sorted by name.
    pub async fn clients_of(&self, trainer_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.email, u.password_hash, u.role, u.goal, u.created_at
             FROM users u
             JOIN trainer_clients tc ON tc.client_id = u.id
             WHERE tc.trainer_id = $1
             ORDER BY u.name",
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await
    }

    pub async fn is_client_of(&self, trainer_id: Uuid, client_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM trainer_clients WHERE trainer_id = $1 AND client_id = $2)",
        )
        .bind(trainer_id)
        .bind(client_id)
        .fetch_one(&self.db)
        .await
    }

    /// Delete an account and everything that hangs off it, in one transaction.
    ///
    /// Seats held by the user are released through the same path as a
    /// cancellation, so waitlisted members are promoted into them.
    pub async fn remove_user(&self, actor: &Actor, user_id: Uuid) -> Result<String, GymError> {
        if actor.role != UserRole::Admin {
            return Err(GymError::Unauthorized);
        }
        if actor.user_id == user_id {
            return Err(GymError::InvalidInput(
                "You cannot remove your own account.".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GymError::NotFound("User"))?;

        sqlx::query("DELETE FROM waitlist WHERE user_id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY booking_date"
        ))
        .bind(user.id)
        .fetch_all(&mut *tx)
        .await?;

        for booking in &bookings {
            release_seat(&mut tx, booking).await?;
        }

        for statement in [
            "DELETE FROM workout_plans WHERE member_id = $1",
            "DELETE FROM weight_logs WHERE user_id = $1",
            "DELETE FROM trainer_clients WHERE trainer_id = $1 OR client_id = $1",
        ] {
            sqlx::query(statement).bind(user.id).execute(&mut *tx).await?;
        }

        sqlx::query("DELETE FROM activity_logs WHERE user_name = $1")
            .bind(&user.name)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        ActivityService::record(
            &mut *tx,
            &actor.name,
            &format!("removed user '{}' (ID: {}).", user.name, user.id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            released_bookings = bookings.len(),
            "Removed user"
        );
        Ok(user.name)
    }
}

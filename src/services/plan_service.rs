use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{AssignPlanRequest, UserRole, WorkoutPlan};
use crate::services::activity_service::ActivityService;
use crate::services::errors::GymError;

#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Assign a workout plan to a member. The plan is signed with `trainer_name`.
    pub async fn assign_plan(
        &self,
        member_id: Uuid,
        trainer_name: &str,
        title: &str,
        description: &str,
    ) -> Result<Uuid, GymError> {
        if title.trim().is_empty() {
            return Err(GymError::InvalidInput("Plan title cannot be empty.".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let member_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1 AND role = 'member')",
        )
        .bind(member_id)
        .fetch_one(&mut *tx)
        .await?;
        if !member_exists {
            return Err(GymError::NotFound("Member"));
        }

        let plan_id: Uuid = sqlx::query_scalar(
            "INSERT INTO workout_plans (id, member_id, trainer_name, title, description, assigned_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(member_id)
        .bind(trainer_name)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        ActivityService::record(
            &mut *tx,
            trainer_name,
            &format!("assigned plan '{}' to member ID {}.", title, member_id),
        )
        .await?;

        tx.commit().await?;
        Ok(plan_id)
    }

    /// `assign_plan` on behalf of an authenticated trainer.
    pub async fn assign_plan_as(&self, actor: &Actor, request: AssignPlanRequest) -> Result<Uuid, GymError> {
        if actor.role != UserRole::Trainer {
            return Err(GymError::Unauthorized);
        }
        self.assign_plan(request.member_id, &actor.name, &request.title, &request.description)
            .await
    }

    /// Plans for a member, newest first.
    pub async fn plans_for_member(&self, member_id: Uuid) -> Result<Vec<WorkoutPlan>, sqlx::Error> {
        sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, member_id, trainer_name, title, description, assigned_date
             FROM workout_plans WHERE member_id = $1
             ORDER BY assigned_date DESC",
        )
        .bind(member_id)
        .fetch_all(&self.db)
        .await
    }

    pub async fn count_for_members(&self, member_ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM workout_plans WHERE member_id = ANY($1)")
            .bind(member_ids)
            .fetch_one(&self.db)
            .await
    }
}

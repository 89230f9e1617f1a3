use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::auth::{jwt_auth_middleware, Actor, AuthService};
use crate::models::{AssignPlanRequest, WorkoutPlan};
use crate::services::{GymError, PlanService};

#[derive(Clone)]
pub struct PlansAppState {
    pub plan_service: PlanService,
}

pub fn plans_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = PlansAppState {
        plan_service: PlanService::new(db),
    };

    Router::new()
        .route("/", get(my_plans).post(assign_plan))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

#[derive(Debug, serde::Serialize)]
pub struct PlanAssigned {
    pub plan_id: Uuid,
}

/// Assign a workout plan to a member (trainers only)
#[tracing::instrument(skip(state, actor, request), fields(user_id = %actor.user_id))]
pub async fn assign_plan(
    State(state): State<PlansAppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<AssignPlanRequest>,
) -> Result<Json<ApiResponse<PlanAssigned>>, GymError> {
    let plan_id = state.plan_service.assign_plan_as(&actor, request).await?;
    Ok(Json(ApiResponse::ok(
        "Plan assigned successfully!",
        PlanAssigned { plan_id },
    )))
}

pub async fn my_plans(
    State(state): State<PlansAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<WorkoutPlan>>>, GymError> {
    let plans = state.plan_service.plans_for_member(actor.user_id).await?;
    Ok(Json(ApiResponse::ok("Workout plans", plans)))
}

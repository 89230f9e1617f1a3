use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::auth::{jwt_auth_middleware, Actor, AuthService};
use crate::models::{AdminDashboard, ClientDetail, MemberDashboard, TrainerDashboard};
use crate::services::{DashboardService, GymError, UserService};

#[derive(Clone)]
pub struct DashboardAppState {
    pub dashboard_service: DashboardService,
    pub user_service: UserService,
}

fn dashboard_state(db: PgPool) -> DashboardAppState {
    DashboardAppState {
        dashboard_service: DashboardService::new(db.clone()),
        user_service: UserService::new(db),
    }
}

pub fn dashboard_routes(db: PgPool, auth_service: AuthService) -> Router {
    Router::new()
        .route("/member", get(member_dashboard))
        .route("/trainer", get(trainer_dashboard))
        .route("/admin", get(admin_dashboard))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(dashboard_state(db))
}

/// Trainer access to members on their roster
pub fn client_routes(db: PgPool, auth_service: AuthService) -> Router {
    Router::new()
        .route("/:client_id", get(client_detail))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(dashboard_state(db))
}

pub fn admin_routes(db: PgPool, auth_service: AuthService) -> Router {
    Router::new()
        .route("/users/:user_id", get(client_detail).delete(remove_user))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(dashboard_state(db))
}

pub async fn member_dashboard(
    State(state): State<DashboardAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<MemberDashboard>>, GymError> {
    let dashboard = state.dashboard_service.member_dashboard(&actor).await?;
    Ok(Json(ApiResponse::ok("Member dashboard", dashboard)))
}

pub async fn trainer_dashboard(
    State(state): State<DashboardAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<TrainerDashboard>>, GymError> {
    let dashboard = state.dashboard_service.trainer_dashboard(&actor).await?;
    Ok(Json(ApiResponse::ok("Trainer dashboard", dashboard)))
}

pub async fn admin_dashboard(
    State(state): State<DashboardAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<AdminDashboard>>, GymError> {
    let dashboard = state.dashboard_service.admin_dashboard(&actor).await?;
    Ok(Json(ApiResponse::ok("Admin dashboard", dashboard)))
}

pub async fn client_detail(
    State(state): State<DashboardAppState>,
    Extension(actor): Extension<Actor>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClientDetail>>, GymError> {
    let detail = state.dashboard_service.client_detail(&actor, client_id).await?;
    Ok(Json(ApiResponse::ok("Client detail", detail)))
}

#[tracing::instrument(skip(state, actor), fields(admin_id = %actor.user_id))]
pub async fn remove_user(
    State(state): State<DashboardAppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, GymError> {
    let name = state.user_service.remove_user(&actor, user_id).await?;
    Ok(Json(ApiResponse::message(format!(
        "User '{name}' has been successfully removed."
    ))))
}

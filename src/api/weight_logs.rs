use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use sqlx::PgPool;

use crate::api::response::ApiResponse;
use crate::auth::{jwt_auth_middleware, Actor, AuthService};
use crate::models::{LogWeightRequest, WeightLog};
use crate::services::{GymError, WeightLogService};

#[derive(Clone)]
pub struct WeightLogsAppState {
    pub weight_log_service: WeightLogService,
}

pub fn weight_log_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = WeightLogsAppState {
        weight_log_service: WeightLogService::new(db),
    };

    Router::new()
        .route("/", get(weight_history).post(log_weight))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

pub async fn log_weight(
    State(state): State<WeightLogsAppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<LogWeightRequest>,
) -> Result<Json<ApiResponse<WeightLog>>, GymError> {
    let entry = state.weight_log_service.log_weight(&actor, request).await?;
    Ok(Json(ApiResponse::ok("Weight logged", entry)))
}

pub async fn weight_history(
    State(state): State<WeightLogsAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<WeightLog>>>, GymError> {
    let history = state.weight_log_service.history(actor.user_id).await?;
    Ok(Json(ApiResponse::ok("Weight history", history)))
}

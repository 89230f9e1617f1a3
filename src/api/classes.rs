use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, put},
    Extension, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::auth::{jwt_auth_middleware, Actor, AuthService};
use crate::models::{ClassOverview, GymClass, UpdateCapacityRequest};
use crate::services::{BookingService, ClassService, GymError};

#[derive(Clone)]
pub struct ClassesAppState {
    pub class_service: ClassService,
    pub booking_service: BookingService,
}

pub fn classes_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = ClassesAppState {
        class_service: ClassService::new(db.clone()),
        booking_service: BookingService::new(db),
    };

    Router::new()
        .route("/", get(list_classes))
        .route("/:class_id/capacity", put(update_capacity))
        .route("/:class_id/waitlist", delete(leave_waitlist))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

pub async fn list_classes(
    State(state): State<ClassesAppState>,
) -> Result<Json<ApiResponse<Vec<ClassOverview>>>, GymError> {
    let classes = state.class_service.list_classes().await?;
    Ok(Json(ApiResponse::ok("Classes", classes)))
}

#[tracing::instrument(skip(state, actor, request), fields(user_id = %actor.user_id))]
pub async fn update_capacity(
    State(state): State<ClassesAppState>,
    Extension(actor): Extension<Actor>,
    Path(class_id): Path<Uuid>,
    Json(request): Json<UpdateCapacityRequest>,
) -> Result<Json<ApiResponse<GymClass>>, GymError> {
    let class = state
        .class_service
        .update_capacity(&actor, class_id, request.capacity)
        .await?;
    Ok(Json(ApiResponse::ok("Capacity updated", class)))
}

#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn leave_waitlist(
    State(state): State<ClassesAppState>,
    Extension(actor): Extension<Actor>,
    Path(class_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, GymError> {
    state.booking_service.leave_waitlist(&actor, class_id).await?;
    Ok(Json(ApiResponse::message("You have left the waitlist.")))
}

use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::auth::{jwt_auth_middleware, Actor, AuthService};
use crate::models::{
    BookClassRequest, Booking, BookingDetails, BookingOutcome, CancelOutcome,
    MarkAttendanceRequest,
};
use crate::services::{BookingService, GymError};

#[derive(Clone)]
pub struct BookingsAppState {
    pub booking_service: BookingService,
}

pub fn bookings_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = BookingsAppState {
        booking_service: BookingService::new(db),
    };

    Router::new()
        .route("/", get(my_bookings).post(book_class))
        .route("/:booking_id/cancel", post(cancel_booking))
        .route("/attendance", post(mark_attendance))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(state)
}

/// Book a class for the caller, falling back to the waitlist when full
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn book_class(
    State(state): State<BookingsAppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<BookClassRequest>,
) -> Result<Json<ApiResponse<BookingOutcome>>, GymError> {
    let outcome = state.booking_service.book(&actor, request.class_id).await?;
    Ok(Json(ApiResponse::with_flag(
        outcome.is_success(),
        outcome.message(),
        outcome,
    )))
}

/// Cancel a booking; the oldest waitlisted member takes the seat
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn cancel_booking(
    State(state): State<BookingsAppState>,
    Extension(actor): Extension<Actor>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CancelOutcome>>, GymError> {
    let outcome = state.booking_service.cancel(&actor, booking_id).await?;
    Ok(Json(ApiResponse::ok("Booking cancelled successfully.", outcome)))
}

#[tracing::instrument(skip(state, actor, request), fields(user_id = %actor.user_id))]
pub async fn mark_attendance(
    State(state): State<BookingsAppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<MarkAttendanceRequest>,
) -> Result<Json<ApiResponse<Booking>>, GymError> {
    let booking = state
        .booking_service
        .mark_attendance(&actor, request.booking_id, &request.status)
        .await?;
    Ok(Json(ApiResponse::ok("Attendance updated", booking)))
}

pub async fn my_bookings(
    State(state): State<BookingsAppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<BookingDetails>>>, GymError> {
    let bookings = state.booking_service.bookings_for_user(actor.user_id).await?;
    Ok(Json(ApiResponse::ok("Bookings", bookings)))
}

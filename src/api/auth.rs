use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::response::ApiResponse;
use crate::auth::{
    jwt_auth_middleware, Actor, AuthError, AuthResponse, AuthService, LoginRequest,
    SignupRequest, SignupResponse,
};
use crate::models::UserRole;

/// Authentication routes
pub fn auth_routes(auth_service: AuthService) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route(
            "/me",
            get(whoami).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(auth_service)
}

#[tracing::instrument(skip(auth_service, request))]
async fn signup(
    State(auth_service): State<AuthService>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    let user = auth_service.signup(request).await?;
    Ok(Json(SignupResponse {
        success: true,
        message: "Account created! Please log in.".to_string(),
        user: user.into(),
    }))
}

#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

#[derive(Debug, serde::Serialize)]
struct WhoAmI {
    user_id: uuid::Uuid,
    name: String,
    email: String,
    role: UserRole,
}

async fn whoami(Extension(actor): Extension<Actor>) -> Json<ApiResponse<WhoAmI>> {
    Json(ApiResponse::ok(
        "Authenticated",
        WhoAmI {
            user_id: actor.user_id,
            name: actor.name,
            email: actor.email,
            role: actor.role,
        },
    ))
}

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::bookings::bookings_routes;
use super::classes::classes_routes;
use super::dashboards::{admin_routes, client_routes, dashboard_routes};
use super::health::health_check;
use super::plans::plans_routes;
use super::weight_logs::weight_log_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService};

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let auth_service = AuthService::new(db.clone(), jwt_secret);

    let api = Router::new()
        .nest("/auth", auth_routes(auth_service.clone()))
        .nest("/classes", classes_routes(db.clone(), auth_service.clone()))
        .nest("/bookings", bookings_routes(db.clone(), auth_service.clone()))
        .nest("/plans", plans_routes(db.clone(), auth_service.clone()))
        .nest("/weight-logs", weight_log_routes(db.clone(), auth_service.clone()))
        .nest("/dashboard", dashboard_routes(db.clone(), auth_service.clone()))
        .nest("/clients", client_routes(db.clone(), auth_service.clone()))
        .nest("/admin", admin_routes(db, auth_service));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}

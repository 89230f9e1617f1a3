// Router-level tests. The pool is lazy and none of these requests reach the
// database: each one is decided by the auth layer or by a role/input check
// that runs before any query.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use smart_gym::api::routes::create_routes;
use smart_gym::auth::JwtService;
use smart_gym::config::DatabaseConfig;
use smart_gym::models::{User, UserRole};

const TEST_SECRET: &str = "test_secret_key_for_testing_only";

fn create_test_app() -> Router {
    let pool = DatabaseConfig::from_env().unwrap().create_lazy_pool().unwrap();
    create_routes(pool, TEST_SECRET)
}

fn token_for(role: UserRole) -> String {
    let user = User {
        id: Uuid::new_v4(),
        name: format!("Test {}", role.as_str()),
        email: format!("{}@example.com", role.as_str()),
        password_hash: String::new(),
        role,
        goal: None,
        created_at: Utc::now(),
    };
    JwtService::new(TEST_SECRET).create_access_token(&user).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let response = create_test_app()
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let response = create_test_app()
        .oneshot(request(Method::GET, "/api/bookings", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let user = User {
        id: Uuid::new_v4(),
        name: "Mallory".to_string(),
        email: "mallory@example.com".to_string(),
        password_hash: String::new(),
        role: UserRole::Admin,
        goal: None,
        created_at: Utc::now(),
    };
    let forged = JwtService::new("some-other-secret")
        .create_access_token(&user)
        .unwrap();

    let response = create_test_app()
        .oneshot(request(Method::GET, "/api/dashboard/admin", Some(&forged), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_open_trainer_dashboard() {
    let token = token_for(UserRole::Member);
    let response = create_test_app()
        .oneshot(request(Method::GET, "/api/dashboard/trainer", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_member_cannot_mark_attendance() {
    let token = token_for(UserRole::Member);
    let response = create_test_app()
        .oneshot(request(
            Method::POST,
            "/api/bookings/attendance",
            Some(&token),
            Some(json!({ "booking_id": Uuid::new_v4(), "status": "ATTENDED" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_trainer_marking_unknown_status_is_rejected() {
    let token = token_for(UserRole::Trainer);
    let response = create_test_app()
        .oneshot(request(
            Method::POST,
            "/api/bookings/attendance",
            Some(&token),
            Some(json!({ "booking_id": Uuid::new_v4(), "status": "INVALID" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "INVALID_STATUS");
}

#[tokio::test]
async fn test_member_cannot_assign_plan() {
    let token = token_for(UserRole::Member);
    let response = create_test_app()
        .oneshot(request(
            Method::POST,
            "/api/plans",
            Some(&token),
            Some(json!({
                "member_id": Uuid::new_v4(),
                "title": "Self-assigned",
                "description": "Nope"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_trainer_cannot_change_capacity() {
    let token = token_for(UserRole::Trainer);
    let response = create_test_app()
        .oneshot(request(
            Method::PUT,
            &format!("/api/classes/{}/capacity", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "capacity": 10 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_cannot_remove_users() {
    let token = token_for(UserRole::Member);
    let response = create_test_app()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/admin/users/{}", Uuid::new_v4()),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signup_cannot_create_admin() {
    let response = create_test_app()
        .oneshot(request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "name": "Eve",
                "email": "eve@example.com",
                "password": "secret",
                "role": "admin"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

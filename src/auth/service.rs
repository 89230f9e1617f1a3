use sqlx::PgPool;

use crate::auth::password::verify_password;
use crate::auth::{Actor, AuthError, AuthResponse, JwtService, LoginRequest, SignupRequest};
use crate::models::{CreateUser, User, UserRole};
use crate::services::UserService;

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    users: UserService,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            users: UserService::new(db),
        }
    }

    /// Register a new account. Admin accounts are only created by seeding.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        let role = request.role.unwrap_or(UserRole::Member);
        if role == UserRole::Admin {
            return Err(AuthError::InsufficientPermissions);
        }

        let user = self
            .users
            .register(CreateUser {
                name: request.name,
                email: request.email,
                password: request.password,
                role,
                goal: request.goal,
            })
            .await?;

        Ok(user)
    }

    /// Login user. The stored role must match the requested one.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? || user.role != request.role {
            tracing::warn!(email = %request.email, "Rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.jwt_service.create_access_token(&user)?;

        Ok(AuthResponse {
            success: true,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.session_lifetime_seconds(),
            redirect_url: format!("/api/dashboard/{}", user.role.as_str()),
            user: user.into(),
        })
    }

    /// Validate a bearer token and return the caller it identifies.
    pub fn authenticate(&self, token: &str) -> Result<Actor, AuthError> {
        self.jwt_service.extract_actor(token)
    }
}

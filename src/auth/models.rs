use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{UserResponse, UserRole};

/// JWT token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // Subject (user ID)
    pub name: String,   // Display name, used for activity attribution
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// The authenticated caller of a request.
///
/// Built by the auth middleware from the bearer token and passed explicitly
/// into every service call that needs an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl Actor {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            name: claims.name.clone(),
            email: claims.email.clone(),
            role: claims.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>, // Defaults to member
    pub goal: Option<String>,
}

/// The role is part of the login form: an account can only sign in to the
/// dashboard of its own role.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize,
    pub redirect_url: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

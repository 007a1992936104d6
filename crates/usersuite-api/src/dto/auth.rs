//! Authentication DTOs
//!
//! Request and response types for the login endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usersuite_core::models::{Feature, PortalUser};
use validator::Validate;

/// Login request: a dormitory selection plus credentials
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Name of the selected dormitory
    #[validate(length(min = 1, message = "Dormitory is required"))]
    pub dormitory: String,

    /// Backend login name
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Session user as exposed to API clients
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub uid: String,
    pub id: i64,
    pub name: String,
    pub mail: Option<String>,
    pub division: String,
}

impl From<&PortalUser> for UserView {
    fn from(user: &PortalUser) -> Self {
        Self {
            uid: user.uid.clone(),
            id: user.id,
            name: user.name.clone(),
            mail: user.mail.clone(),
            division: user.division.clone(),
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT)
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Token expiration time in seconds
    pub expires_in: i64,

    /// User information
    pub user: UserView,
}

impl LoginResponse {
    /// Create a new login response
    pub fn new(access_token: String, expires_in: i64, user: UserView) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Current session response
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// User information, freshly resolved from the backend
    pub user: UserView,

    /// Mutating features the division's backend offers
    pub supported_features: Vec<Feature>,

    /// Token expiration timestamp
    pub token_expires_at: DateTime<Utc>,
}

/// Logout response
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// Success message
    pub message: String,
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self {
            message: "Logged out successfully".to_string(),
        }
    }
}

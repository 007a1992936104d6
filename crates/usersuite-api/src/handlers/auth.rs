//! Authentication handlers
//!
//! Login selects a dormitory, which fixes the division and thereby the
//! identity backend that verifies the credentials.

use crate::dto::auth::{LoginRequest, LoginResponse, LogoutResponse, MeResponse, UserView};
use crate::dto::ApiResponse;
use actix_web::{cookie::Cookie, web, HttpResponse};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use usersuite_auth::{CurrentUser, JwtService};
use usersuite_core::models::Catalog;
use usersuite_core::traits::UserBackend;
use usersuite_core::AppError;
use validator::Validate;

/// Login endpoint
///
/// POST /api/v1/auth/login
#[instrument(skip(catalog, jwt_service, req), fields(dormitory = %req.dormitory))]
pub async fn login(
    catalog: web::Data<Arc<Catalog>>,
    jwt_service: web::Data<Arc<JwtService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Login validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let username = req.username.trim();

    // The submitted selection must exist in the configured catalog.
    let dormitory = catalog
        .dormitory(&req.dormitory)
        .ok_or_else(|| AppError::DormitoryNotFound(req.dormitory.clone()))?;
    let division = dormitory.division.clone();

    debug!(username = %username, division = %division.name, "Processing login request");

    // UserNotFound and PasswordInvalid surface unchanged; the client shows
    // a different message for each.
    let user = division.backend().authenticate(username, &req.password).await?;

    let token = jwt_service.create_session(&user)?;
    let expires_in = jwt_service.expiration_secs();

    info!(uid = %user.uid, division = %division.name, "Login successful");

    let response = LoginResponse::new(token.clone(), expires_in, UserView::from(&user));

    let cookie = Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(actix_web::cookie::time::Duration::seconds(expires_in))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response)))
}

/// Logout endpoint
///
/// POST /api/v1/auth/logout
#[instrument(skip(current))]
pub async fn logout(current: CurrentUser) -> HttpResponse {
    info!(uid = %current.user.uid, "User logged out");

    // Clear the token cookie; the stateless session has nothing to revoke.
    let cookie = Cookie::build("token", "")
        .path("/")
        .http_only(true)
        .max_age(actix_web::cookie::time::Duration::seconds(0))
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(LogoutResponse::default()))
}

/// Current session info
///
/// GET /api/v1/auth/me
#[instrument(skip(current))]
pub async fn me(current: CurrentUser) -> Result<HttpResponse, AppError> {
    let token_expires_at = Utc
        .timestamp_opt(current.claims.exp, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let response = MeResponse {
        user: UserView::from(&current.user),
        supported_features: current.division.backend().features().supported(),
        token_expires_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid_req = LoginRequest {
            dormitory: "block-a".to_string(),
            username: "mmuster".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid_req.validate().is_ok());

        let invalid_req = LoginRequest {
            dormitory: "block-a".to_string(),
            username: "".to_string(),
            password: "".to_string(),
        };
        assert!(invalid_req.validate().is_err());
    }
}

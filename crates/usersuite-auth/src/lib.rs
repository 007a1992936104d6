//! Session handling for Usersuite
//!
//! This crate provides JWT-based session tokens and the actix-web request
//! extractor resolving the current user.
//!
//! The session design follows the portal's per-request model: the token
//! carries identity claims only (login, division, account id); the user is
//! reconstructed from the division's backend on every request, so handlers
//! never see stale account data.
//!
//! # Examples
//!
//! ## Creating a session token
//!
//! ```no_run
//! use usersuite_auth::JwtService;
//! # use usersuite_core::models::PortalUser;
//!
//! # fn demo(user: PortalUser) -> Result<(), usersuite_core::AppError> {
//! let jwt_service = JwtService::new("your-secret-key", 1800);
//! let token = jwt_service.create_session(&user)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the extractor in actix-web
//!
//! ```no_run
//! use actix_web::HttpResponse;
//! use usersuite_auth::CurrentUser;
//!
//! async fn account_overview(current: CurrentUser) -> HttpResponse {
//!     HttpResponse::Ok().json(serde_json::json!({
//!         "uid": current.user.uid,
//!         "division": current.division.name,
//!     }))
//! }
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::CurrentUser;

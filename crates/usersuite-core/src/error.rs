//! Unified error handling for Usersuite
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.

use crate::models::Feature;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Account Lookup Errors ====================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password invalid")]
    PasswordInvalid,

    // ==================== Backend Errors ====================
    /// The identity backend answered with a non-success status, was
    /// unreachable, or returned a reply that could not be interpreted.
    /// Fatal for the current call; never retried.
    #[error("Backend error: {0}")]
    Backend(String),

    // ==================== Capability Errors ====================
    /// The division's backend does not support the requested feature.
    /// Raised before any backend call is attempted.
    #[error("Feature not supported: {0}")]
    NotSupported(Feature),

    // ==================== Catalog Errors ====================
    #[error("Dormitory not found: {0}")]
    DormitoryNotFound(String),

    #[error("Division not found: {0}")]
    DivisionNotFound(String),

    // ==================== Authentication Errors ====================
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::PasswordInvalid
            | AppError::InvalidToken(_)
            | AppError::TokenExpired
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden | AppError::NotSupported(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::UserNotFound(_)
            | AppError::DormitoryNotFound(_)
            | AppError::DivisionNotFound(_) => StatusCode::NOT_FOUND,

            // 502 Bad Gateway
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UserNotFound(_) => "user_not_found",
            AppError::PasswordInvalid => "password_invalid",
            AppError::Backend(_) => "backend_error",
            AppError::NotSupported(_) => "not_supported",
            AppError::DormitoryNotFound(_) => "dormitory_not_found",
            AppError::DivisionNotFound(_) => "division_not_found",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::PasswordHash(_) => "password_error",
            AppError::Validation(_) => "validation_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ipnetwork::IpNetworkError> for AppError {
    fn from(err: ipnetwork::IpNetworkError) -> Self {
        AppError::Validation(err.to_string())
    }
}

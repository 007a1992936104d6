//! Usersuite Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Usersuite portal. It includes:
//!
//! - Domain models (Division, Dormitory, SubnetCollection, PortalUser,
//!   traffic records, feature sets)
//! - The per-division user backend contract
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;
pub mod validators;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

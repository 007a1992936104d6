//! Usersuite Backend Adapters
//!
//! This crate provides the concrete identity backend adapters bound to the
//! divisions of the catalog:
//!
//! - [`rest::RestBackend`] — token-authenticated REST identity API
//! - [`sample::SampleBackend`] — in-memory demo backend for debug divisions
//!
//! plus [`catalog::build_catalog`], which assembles the process-wide
//! registry from configuration.

pub mod catalog;
pub mod rest;
pub mod sample;

pub use catalog::build_catalog;
pub use rest::RestBackend;
pub use sample::SampleBackend;

// Re-export commonly used types
pub use usersuite_core::{AppError, AppResult};

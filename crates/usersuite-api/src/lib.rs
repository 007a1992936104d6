//! API layer for Usersuite
//!
//! HTTP handlers exposing the portal core: dormitory selection, login,
//! account information, traffic data, and the feature-gated mutators.

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::ApiResponse;

// Re-export handler configuration functions
pub use handlers::{configure_account, configure_auth, configure_dormitories};

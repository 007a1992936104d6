//! HTTP request handlers

pub mod account;
pub mod auth;
pub mod dormitory;

pub use account::configure as configure_account;
pub use auth::configure as configure_auth;
pub use dormitory::configure as configure_dormitories;

//! Request and response types of the HTTP API

pub mod account;
pub mod auth;
pub mod common;
pub mod dormitory;

pub use common::ApiResponse;

//! Shared types for the canteen service
//!
//! Common types used by canteen-server and its clients: domain models,
//! the order status machine, error types, and API request/response DTOs.

pub mod client;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

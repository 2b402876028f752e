//! Data models
//!
//! Shared between canteen-server and its web client (via API).
//! IDs are UUID v4 strings.

pub mod analytics;
pub mod cart;
pub mod menu_item;
pub mod notification;
pub mod review;
pub mod time_slot;
pub mod user;

// Re-exports
pub use analytics::*;
pub use cart::*;
pub use menu_item::*;
pub use notification::*;
pub use review::*;
pub use time_slot::*;
pub use user::*;

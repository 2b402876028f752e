//! Order lifecycle
//!
//! Checkout, status transitions, notifications and live events for orders.
//! See [`OrdersManager`] for the checkout sequence.

pub mod error;
pub mod manager;

pub use error::{OrderError, OrderResult};
pub use manager::OrdersManager;

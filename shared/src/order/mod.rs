//! Order types
//!
//! - Status machine: `ordered -> preparing -> ready -> served`, plus `cancelled`
//! - Order record with immutable item snapshot
//! - Events broadcast on placement and on every status change

pub mod event;
pub mod snapshot;
pub mod status;

// Re-exports
pub use event::{OrderEvent, OrderEventType};
pub use snapshot::{Order, OrderCounts, OrderView, UserOrders};
pub use status::OrderStatus;

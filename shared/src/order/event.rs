//! Order events broadcast to live subscribers

use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// What happened to the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    StatusChanged,
}

/// Order event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    pub event_type: OrderEventType,
    pub order_id: String,
    pub user_id: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<OrderStatus>,
    pub status: OrderStatus,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

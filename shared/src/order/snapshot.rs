//! Order record

use serde::{Deserialize, Serialize};

use super::OrderStatus;
use crate::models::CartItem;

/// A placed order
///
/// `items` is a snapshot of the cart at checkout; later menu edits or
/// deletions do not touch it. Only `status` and `updated_at` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    /// Pre-tax amount
    pub total_amount: f64,
    pub status: OrderStatus,
    /// Pickup slot label "HH:MM"
    pub scheduled_time: String,
    /// Daily pickup token, e.g. "20240301-007"
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Minutes, max over item preparation times
    pub estimated_preparation_time: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Order with its tax breakdown, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub tax: f64,
    pub total_with_tax: f64,
}

/// Per-status order counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounts {
    pub ordered: usize,
    pub preparing: usize,
    pub ready: usize,
    pub served: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl OrderCounts {
    pub fn bump(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Ordered => self.ordered += 1,
            OrderStatus::Preparing => self.preparing += 1,
            OrderStatus::Ready => self.ready += 1,
            OrderStatus::Served => self.served += 1,
            OrderStatus::Cancelled => self.cancelled += 1,
        }
        self.total += 1;
    }
}

/// A student's orders split for the tracking screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserOrders {
    /// ordered / preparing / ready, newest first
    pub active: Vec<OrderView>,
    /// served / cancelled, newest first
    pub completed: Vec<OrderView>,
}

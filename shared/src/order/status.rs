//! Order status machine
//!
//! ```text
//! ordered -> preparing -> ready -> served
//!    \           \          \
//!     +-----------+----------+--> cancelled
//! ```
//!
//! `served` and `cancelled` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Ordered,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Ordered,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Cancelled,
    ];

    /// Forward successor, `None` for terminal states
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Ordered => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Served | OrderStatus::Cancelled)
    }

    /// Still in the kitchen pipeline (shown under "active" orders)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Successor step, or cancellation from any non-terminal state
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Title-case label used in notification titles
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Served => "Served",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

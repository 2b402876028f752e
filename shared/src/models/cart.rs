//! Cart Model

use serde::{Deserialize, Serialize};

use super::MenuItem;

/// A menu item with a quantity, as held in a cart and snapshotted into orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub item: MenuItem,
    /// Always >= 1
    pub quantity: u32,
}

/// Cart contents with derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    /// Pre-tax sum of price x quantity
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

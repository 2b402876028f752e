//! Review Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A student's rating of a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub menu_item_id: String,
    /// 1..=5
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreate {
    #[validate(length(min = 1))]
    pub menu_item_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: String,
}

//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Nutrition facts per serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price in rupees
    pub price: f64,
    pub category: String,
    /// Image URL or path
    pub image: String,
    pub is_veg: bool,
    pub cuisine: String,
    /// 0 (none) to 5 (very hot)
    pub spice_level: u8,
    pub allergens: Vec<String>,
    pub nutritional_info: NutritionalInfo,
    pub is_available: bool,
    pub ingredients: Vec<String>,
    /// Mean review rating, one decimal place
    pub average_rating: f64,
    pub review_count: u32,
    /// Preparation time in minutes
    pub preparation_time: u32,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image: String,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    #[validate(range(max = 5))]
    pub spice_level: u8,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub nutritional_info: NutritionalInfo,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[validate(range(min = 1))]
    pub preparation_time: u32,
}

/// Update menu item payload
///
/// Rating fields are owned by the review aggregator and cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
    pub is_veg: Option<bool>,
    pub cuisine: Option<String>,
    #[validate(range(max = 5))]
    pub spice_level: Option<u8>,
    pub allergens: Option<Vec<String>>,
    pub nutritional_info: Option<NutritionalInfo>,
    pub is_available: Option<bool>,
    pub ingredients: Option<Vec<String>>,
    #[validate(range(min = 1))]
    pub preparation_time: Option<u32>,
}

/// Menu listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuQuery {
    /// Case-insensitive name search
    pub search: Option<String>,
    /// Exact category; "All" disables the filter
    pub category: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

//! Manager analytics and dashboard payloads

use serde::{Deserialize, Serialize};

use crate::order::OrderView;

/// Reporting window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyticsPeriod {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl AnalyticsPeriod {
    pub fn days(&self) -> i64 {
        match self {
            AnalyticsPeriod::Week => 7,
            AnalyticsPeriod::Month => 30,
            AnalyticsPeriod::Quarter => 90,
            AnalyticsPeriod::Year => 365,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub revenue: f64,
    pub quantity: u32,
}

/// One day of the trend line, `date` is "YYYY-MM-DD" in the business timezone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub date: String,
    pub orders: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

/// Analytics report over served orders in a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub period: AnalyticsPeriod,
    /// Including tax
    pub total_revenue: f64,
    pub total_orders: usize,
    pub average_order_value: f64,
    /// Distinct customers over all orders ever placed
    pub total_customers: usize,
    /// Top five by quantity
    pub popular_items: Vec<PopularItem>,
    /// Sorted by revenue, highest first
    pub category_performance: Vec<CategoryPerformance>,
    /// Last seven days, oldest first
    pub daily_trend: Vec<DailyTrend>,
    /// Ratings 5 down to 1
    pub rating_distribution: Vec<RatingBucket>,
    pub average_rating: f64,
    pub total_reviews: usize,
}

/// Manager landing page summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_orders: usize,
    pub served_orders: usize,
    /// Served orders, including tax
    pub total_revenue: f64,
    pub out_of_stock: usize,
    pub menu_items: usize,
    pub today_orders: usize,
    pub today_revenue: f64,
    /// Five newest orders
    pub recent_orders: Vec<OrderView>,
}

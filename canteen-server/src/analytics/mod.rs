//! 后台统计
//!
//! 报表只统计 `served` 订单 (营业额含税)，日期按业务时区划分。
//! [`build_report`] / [`build_dashboard`] 是纯函数，服务层只负责取数。

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    AnalyticsPeriod, AnalyticsReport, CategoryPerformance, DailyTrend, DashboardSummary, MenuItem,
    PopularItem, RatingBucket, Review,
};
use shared::order::{Order, OrderStatus};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::menu::MenuCatalog;
use crate::money;
use crate::orders::OrdersManager;
use crate::reviews::{ReviewService, average_rating};
use crate::utils::AppResult;
use crate::utils::time::{day_start_millis, millis_to_date};

const TOP_ITEMS: usize = 5;
const TREND_DAYS: i64 = 7;
const RECENT_ORDERS: usize = 5;

fn revenue(orders: &[&Order]) -> f64 {
    money::sum(orders.iter().map(|o| money::with_tax(o.total_amount)))
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    money::to_f64(money::to_decimal(total) / Decimal::from(count as u64))
}

/// Analytics over served orders created in the last `period.days()` days (today included)
pub fn build_report(
    orders: &[Order],
    reviews: &[Review],
    period: AnalyticsPeriod,
    today: NaiveDate,
    tz: Tz,
) -> AnalyticsReport {
    let since = day_start_millis(today - Duration::days(period.days() - 1), tz);
    let served: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Served && o.created_at >= since)
        .collect();

    let total_revenue = revenue(&served);
    let total_customers = orders
        .iter()
        .map(|o| o.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    // Items and categories
    let mut items: HashMap<&str, PopularItem> = HashMap::new();
    let mut categories: HashMap<&str, (Decimal, u32)> = HashMap::new();
    for line in served.iter().flat_map(|o| o.items.iter()) {
        let line_total = money::to_decimal(line.item.price) * Decimal::from(line.quantity);

        let entry = items
            .entry(line.item.id.as_str())
            .or_insert_with(|| PopularItem {
                menu_item_id: line.item.id.clone(),
                name: line.item.name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
        entry.quantity += line.quantity;
        entry.revenue = money::to_f64(money::to_decimal(entry.revenue) + line_total);

        let category = categories
            .entry(line.item.category.as_str())
            .or_insert((Decimal::ZERO, 0));
        category.0 += line_total;
        category.1 += line.quantity;
    }

    let mut popular_items: Vec<PopularItem> = items.into_values().collect();
    popular_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    popular_items.truncate(TOP_ITEMS);

    let mut category_performance: Vec<CategoryPerformance> = categories
        .into_iter()
        .map(|(category, (revenue, quantity))| CategoryPerformance {
            category: category.to_string(),
            revenue: money::to_f64(revenue),
            quantity,
        })
        .collect();
    category_performance.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });

    let daily_trend = (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let day: Vec<&Order> = orders
                .iter()
                .filter(|o| o.status == OrderStatus::Served && millis_to_date(o.created_at, tz) == date)
                .collect();
            DailyTrend {
                date: date.format("%Y-%m-%d").to_string(),
                orders: day.len(),
                revenue: revenue(&day),
            }
        })
        .collect();

    let rating_distribution = (1..=5u8)
        .rev()
        .map(|rating| RatingBucket {
            rating,
            count: reviews.iter().filter(|r| r.rating == rating).count(),
        })
        .collect();
    let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();

    AnalyticsReport {
        period,
        total_revenue,
        total_orders: served.len(),
        average_order_value: average(total_revenue, served.len()),
        total_customers,
        popular_items,
        category_performance,
        daily_trend,
        rating_distribution,
        average_rating: average_rating(&ratings),
        total_reviews: reviews.len(),
    }
}

/// Manager landing page numbers; `orders` must be newest first
pub fn build_dashboard(orders: &[Order], menu: &[MenuItem], today: NaiveDate, tz: Tz) -> DashboardSummary {
    let served: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Served)
        .collect();
    let today_orders: Vec<&Order> = orders
        .iter()
        .filter(|o| millis_to_date(o.created_at, tz) == today)
        .collect();
    let today_billable: Vec<&Order> = today_orders
        .iter()
        .copied()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .collect();

    DashboardSummary {
        active_orders: orders.iter().filter(|o| o.status.is_active()).count(),
        served_orders: served.len(),
        total_revenue: revenue(&served),
        out_of_stock: menu.iter().filter(|m| !m.is_available).count(),
        menu_items: menu.len(),
        today_orders: today_orders.len(),
        today_revenue: revenue(&today_billable),
        recent_orders: orders
            .iter()
            .take(RECENT_ORDERS)
            .cloned()
            .map(OrdersManager::view)
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    orders: Arc<OrdersManager>,
    reviews: ReviewService,
    menu: MenuCatalog,
    tz: Tz,
}

impl AnalyticsService {
    pub fn new(orders: Arc<OrdersManager>, reviews: ReviewService, menu: MenuCatalog, tz: Tz) -> Self {
        Self {
            orders,
            reviews,
            menu,
            tz,
        }
    }

    pub fn report(&self, period: AnalyticsPeriod, today: NaiveDate) -> AppResult<AnalyticsReport> {
        let orders = self.orders.all_orders()?;
        let reviews = self.reviews.all()?;
        Ok(build_report(&orders, &reviews, period, today, self.tz))
    }

    pub fn dashboard(&self, today: NaiveDate) -> AppResult<DashboardSummary> {
        let orders = self.orders.all_orders()?;
        let menu = self.menu.all()?;
        Ok(build_dashboard(&orders, &menu, today, self.tz))
    }
}

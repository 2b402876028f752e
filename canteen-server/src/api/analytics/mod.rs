//! Analytics API (manager only)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/analytics?period=7d | GET | 报表 (7d / 30d / 90d / 1y，默认 30d) |
//! | /api/analytics/dashboard | GET | 管理首页汇总 |

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use serde::Deserialize;

use crate::auth::require_manager;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};
use shared::models::{AnalyticsPeriod, AnalyticsReport, DashboardSummary};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/analytics", get(report))
        .route("/api/analytics/dashboard", get(dashboard))
        .layer(middleware::from_fn(require_manager))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: AnalyticsPeriod,
}

async fn report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ApiResponse<AnalyticsReport>>> {
    Ok(ok(state.analytics.report(query.period, state.today())?))
}

async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    Ok(ok(state.analytics.dashboard(state.today())?))
}

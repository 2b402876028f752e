//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/health | GET | 健康检查 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    /// 数据库可读
    database: bool,
    /// 今日已发放取餐号数量
    tokens_issued_today: u64,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let issued = state.orders.tokens().issued(state.today());
    let database = issued.is_ok();
    if let Err(e) = &issued {
        tracing::warn!(error = %e, "Health check: database read failed");
    }

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
        tokens_issued_today: issued.unwrap_or(0),
    })
}

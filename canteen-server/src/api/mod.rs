//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、验证码、登录、找回密码
//! - [`menu`] - 菜单浏览与管理
//! - [`cart`] - 购物车
//! - [`slots`] - 取餐时段
//! - [`orders`] - 下单与订单状态
//! - [`reviews`] - 菜品评价
//! - [`notifications`] - 站内通知
//! - [`analytics`] - 后台统计

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod health;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod slots;

/// Build the Axum router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(cart::router())
        .merge(slots::router())
        .merge(orders::router())
        .merge(reviews::router())
        .merge(notifications::router())
        .merge(analytics::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // JWT 认证中间件 - 在 Router 级别应用，require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

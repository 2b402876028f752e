//! Order API Module
//!
//! 学生下单、查看和取消自己的订单；管理员查看全部订单并推进状态。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_manager;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由：下单、我的订单、详情 (本人或管理员)、取消
    let user_routes = Router::new()
        .route("/", post(handler::create))
        .route("/mine", get(handler::mine))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel));

    // 管理路由：仅 manager
    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/counts", get(handler::counts))
        .route("/bulk-advance", post(handler::bulk_advance))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_manager));

    user_routes.merge(manage_routes)
}

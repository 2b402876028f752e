//! Menu API 模块
//!
//! 浏览 (GET) 无需登录；增删改与上下架仅管理员可用。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/availability", put(handler::set_availability))
        .layer(middleware::from_fn(require_manager));

    read_routes.merge(manage_routes)
}

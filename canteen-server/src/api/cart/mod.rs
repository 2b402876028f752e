//! Cart API 模块
//!
//! 购物车只保存在内存中，按当前用户隔离。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view).delete(handler::clear))
        .route("/items", post(handler::add))
        .route("/items/{item_id}", put(handler::set_quantity).delete(handler::remove))
}

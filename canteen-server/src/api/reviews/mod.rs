//! Review API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/reviews | POST | 评价菜品 (1-5 星) |
//! | /api/reviews/item/{id} | GET | 菜品的评价，最新在前 |
//! | /api/reviews/item/{id}/mine | GET | 当前用户是否已评价 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reviews", post(handler::create))
        .route("/api/reviews/item/{id}", get(handler::list_for_item))
        .route("/api/reviews/item/{id}/mine", get(handler::has_reviewed))
}

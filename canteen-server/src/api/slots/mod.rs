//! Pickup slot API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/slots | GET | 今日剩余取餐时段及占用 |
//! | /api/slots/{time} | GET | 指定时段是否可约 |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, ok};
use shared::models::TimeSlot;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/slots", get(current))
        .route("/api/slots/{time}", get(availability))
}

#[derive(Debug, Serialize)]
pub struct SlotAvailability {
    time: String,
    available: bool,
}

async fn current(State(state): State<ServerState>) -> Json<ApiResponse<Vec<TimeSlot>>> {
    ok(state.orders.slots().current_slots(state.now()))
}

async fn availability(
    State(state): State<ServerState>,
    Path(time): Path<String>,
) -> Json<ApiResponse<SlotAvailability>> {
    let available = state.orders.slots().is_available(state.now(), &time);
    ok(SlotAvailability { time, available })
}

//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, validate_payload};
use shared::client::{AddToCartRequest, SetQuantityRequest};
use shared::models::CartView;

pub async fn view(State(state): State<ServerState>, user: CurrentUser) -> Json<ApiResponse<CartView>> {
    ok(state.carts.view(&user.id))
}

/// Add an item; an existing line has its quantity increased
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    validate_payload(&req)?;
    let quantity = req.quantity.unwrap_or(1);
    Ok(ok(state.carts.add(&user.id, &req.menu_item_id, quantity)?))
}

/// Quantity <= 0 removes the line
pub async fn set_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
    Json(req): Json<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(ok(state.carts.set_quantity(&user.id, &item_id, req.quantity)?))
}

pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(ok(state.carts.remove(&user.id, &item_id)?))
}

pub async fn clear(State(state): State<ServerState>, user: CurrentUser) -> Json<ApiResponse<CartView>> {
    state.carts.clear(&user.id);
    ok(state.carts.view(&user.id))
}

//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::OrdersManager;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message, validate_payload};
use shared::client::{
    BulkAdvanceRequest, BulkAdvanceResponse, CreateOrderRequest, OrderListQuery,
    UpdateOrderStatusRequest,
};
use shared::order::{Order, OrderCounts, OrderStatus, OrderView, UserOrders};

/// Checkout the current user's cart
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    validate_payload(&req)?;
    let now = state.now();
    let order = state.carts.with_cart(&user.id, |cart| {
        state.orders.create_order(
            &user.id,
            cart,
            &req.scheduled_time,
            req.special_instructions.clone(),
            now,
        )
    })?;
    Ok(ok_with_message(OrdersManager::view(order), "Order placed"))
}

/// Current user's orders, split into active and completed
pub async fn mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserOrders>>> {
    Ok(ok(state.orders.list_for_user(&user.id)?))
}

/// Order detail, visible to its owner and to managers
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = owned_order(&state, &user, &id)?;
    Ok(ok(OrdersManager::view(order)))
}

/// Students may cancel their own order until the kitchen starts on it;
/// managers may cancel any non-terminal order
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = owned_order(&state, &user, &id)?;
    if !user.is_manager() && order.status != OrderStatus::Ordered {
        return Err(AppError::permission_denied(
            "Orders can only be cancelled before preparation starts",
        )
        .with_detail("status", order.status.as_str()));
    }

    let order = state.orders.cancel(&id)?;
    tracing::info!(order_id = %id, by = %user.id, "Order cancelled");
    Ok(ok(OrdersManager::view(order)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderView>>>> {
    Ok(ok(state.orders.list(&query)?))
}

pub async fn counts(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<OrderCounts>>> {
    Ok(ok(state.orders.counts()?))
}

pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderView>>> {
    let order = state.orders.advance_status(&id, req.status)?;
    tracing::info!(order_id = %id, status = %req.status, manager = %user.email, "Order status updated");
    Ok(ok(OrdersManager::view(order)))
}

pub async fn bulk_advance(
    State(state): State<ServerState>,
    Json(req): Json<BulkAdvanceRequest>,
) -> AppResult<Json<ApiResponse<BulkAdvanceResponse>>> {
    let advanced = state.orders.bulk_advance(req.from)?;
    Ok(ok(BulkAdvanceResponse { advanced }))
}

/// Load an order the current user may see; others' orders read as not found
fn owned_order(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Order> {
    let order = state.orders.get(id)?;
    if order.user_id != user.id && !user.is_manager() {
        security_log!(
            "WARN",
            "order_access_denied",
            user_id = user.id.clone(),
            order_id = id.to_string()
        );
        return Err(AppError::order_not_found(id));
    }
    Ok(order)
}

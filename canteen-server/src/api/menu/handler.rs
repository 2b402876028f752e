//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, validate_payload};
use shared::client::AvailabilityRequest;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuQuery};

/// List menu items (search / category / available_only)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    Ok(ok(state.menu.list(&query)?))
}

/// Distinct categories, "All" first
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    Ok(ok(state.menu.categories()?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    Ok(ok(state.menu.get(&id)?))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    validate_payload(&payload)?;
    let item = state.menu.create(payload)?;
    tracing::info!(item_id = %item.id, name = %item.name, manager = %user.email, "Menu item created");
    Ok(ok(item))
}

pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    validate_payload(&payload)?;
    let item = state.menu.update(&id, payload)?;
    tracing::info!(item_id = %id, manager = %user.email, "Menu item updated");
    Ok(ok(item))
}

pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.menu.delete(&id)?;
    tracing::info!(item_id = %id, manager = %user.email, "Menu item deleted");
    Ok(Json(ApiResponse::ok()))
}

pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<AvailabilityRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    Ok(ok(state.menu.set_availability(&id, req.is_available)?))
}

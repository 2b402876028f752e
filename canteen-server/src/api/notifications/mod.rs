//! Notification API
//!
//! 只能读取和标记当前用户自己的通知。

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};
use shared::models::{Notification, UnreadCount};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/{id}/read", put(mark_read))
}

/// Newest first
async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    Ok(ok(state.notifications.list_for_user(&user.id)?))
}

async fn unread_count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let unread = state.notifications.unread_count(&user.id)?;
    Ok(ok(UnreadCount { unread }))
}

async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    Ok(ok(state.notifications.mark_read(&user.id, &id)?))
}

/// Returns the remaining unread count (always 0)
async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let marked = state.notifications.mark_all_read(&user.id)?;
    tracing::debug!(user_id = %user.id, marked, "Notifications marked read");
    Ok(ok(UnreadCount { unread: 0 }))
}

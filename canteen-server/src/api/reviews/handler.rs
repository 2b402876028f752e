//! Review API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};
use shared::client::HasReviewedResponse;
use shared::models::{Review, ReviewCreate};

/// Rating range and comment length are checked by the review service so an
/// out-of-range rating reports `InvalidRating`
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = state.reviews.add_review(
        &user.id,
        &user.name,
        &payload.menu_item_id,
        payload.rating,
        &payload.comment,
    )?;
    Ok(ok(review))
}

pub async fn list_for_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    Ok(ok(state.reviews.list_for_item(&id)?))
}

pub async fn has_reviewed(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<HasReviewedResponse>>> {
    let has_reviewed = state.reviews.has_reviewed(&user.id, &id)?;
    Ok(ok(HasReviewedResponse { has_reviewed }))
}

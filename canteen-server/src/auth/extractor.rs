//! CurrentUser extractor
//!
//! Handlers take `user: CurrentUser` directly. Behind [`require_auth`](crate::auth::require_auth)
//! the user is already in the request extensions; otherwise the bearer token is checked here.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::middleware::authenticate_bearer;
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate_bearer(&state.get_jwt_service(), &parts.headers, &parts.uri)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

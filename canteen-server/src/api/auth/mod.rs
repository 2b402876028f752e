//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - register / login / OTP / password reset / password-check: public
/// - /api/auth/me, /api/auth/logout: auth middleware handled at Router level
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/send-otp", post(handler::send_otp))
        .route("/api/auth/verify-otp", post(handler::verify_otp))
        .route("/api/auth/reset-password", post(handler::reset_password))
        .route("/api/auth/update-password", post(handler::update_password))
        .route("/api/auth/password-check", post(handler::password_check))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}

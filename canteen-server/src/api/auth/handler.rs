//! Authentication Handlers
//!
//! Sign-up with campus email verification, login, password reset

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message, validate_payload};
use shared::client::{
    EmailRequest, LoginRequest, LoginResponse, PasswordCheckRequest, RegisterRequest,
    UpdatePasswordRequest, VerifyOtpRequest,
};
use shared::models::{PasswordReport, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Student sign-up; a verification code is mailed to the campus address
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    validate_payload(&req)?;
    let user = state.auth.register(req).await?;
    Ok(ok_with_message(user, "Verification code sent"))
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    validate_payload(&req)?;
    let result = state.auth.login(&req.email, &req.password);

    // Fixed delay to prevent timing attacks (before returning the result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    Ok(ok(result?))
}

/// Resend the email verification code
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_payload(&req)?;
    state.auth.send_otp(&req.email).await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(req): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    validate_payload(&req)?;
    let user = state.auth.verify_otp(&req.email, &req.code)?;
    Ok(ok_with_message(user, "Email verified"))
}

/// Always succeeds for unknown campus addresses
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_payload(&req)?;
    state.auth.reset_password(&req.email).await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn update_password(
    State(state): State<ServerState>,
    Json(req): Json<UpdatePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_payload(&req)?;
    state
        .auth
        .update_password(&req.email, &req.code, &req.new_password)?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn password_check(
    State(state): State<ServerState>,
    Json(req): Json<PasswordCheckRequest>,
) -> Json<ApiResponse<PasswordReport>> {
    ok(state.auth.check_password(&req.password))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    Ok(ok(state.auth.me(&user)?))
}

/// Tokens are stateless; logout is recorded for the security log only
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Json<ApiResponse<()>> {
    state.auth.logout(&user);
    Json(ApiResponse::ok())
}

//! Request/response types shared between server and web client

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserInfo;
use crate::order::OrderStatus;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Student sign-up
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(length(max = 100))]
    pub student_id: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Email-only request (OTP resend, password reset)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Email verification code submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

/// Completes a password reset
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// Password strength probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordCheckRequest {
    pub password: String,
}

// =============================================================================
// Cart API DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddToCartRequest {
    #[validate(length(min = 1))]
    pub menu_item_id: String,
    /// Defaults to 1
    #[validate(range(min = 1, max = 99))]
    pub quantity: Option<u32>,
}

/// Quantity <= 0 removes the line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

// =============================================================================
// Order API DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(equal = 5))]
    pub scheduled_time: String,
    #[validate(length(max = 500))]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Advance every order currently in `from` to its successor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAdvanceRequest {
    pub from: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAdvanceResponse {
    pub advanced: usize,
}

/// Manager order listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    /// Case-insensitive match on token or order id
    pub search: Option<String>,
}

// =============================================================================
// Menu API DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasReviewedResponse {
    pub has_reviewed: bool,
}

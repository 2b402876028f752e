//! Unified error codes for the canteen service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Verification errors (OTP, password policy)
//! - 4xxx: Order errors
//! - 5xxx: Pickup slot errors
//! - 6xxx: Menu and cart errors
//! - 7xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email domain is not allowed to register
    EmailDomainNotAllowed = 1008,
    /// Email already registered
    EmailAlreadyRegistered = 1009,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Manager role required
    ManagerRequired = 2002,

    // ==================== 3xxx: Verification ====================
    /// Verification code expired
    VerificationCodeExpired = 3013,
    /// Verification code invalid
    VerificationCodeInvalid = 3014,
    /// Too many verification attempts
    TooManyAttempts = 3015,
    /// Email not verified
    EmailNotVerified = 3016,
    /// Password does not meet the strength policy
    PasswordTooWeak = 3018,
    /// Verification code requested again too soon
    ResendTooSoon = 3022,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been served
    OrderAlreadyServed = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Cart is empty
    CartEmpty = 4007,
    /// Status transition not allowed
    InvalidStatusTransition = 4008,

    // ==================== 5xxx: Slot ====================
    /// Pickup slot not offered
    SlotNotFound = 5101,
    /// Pickup slot fully booked
    SlotFull = 5102,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is currently unavailable
    MenuItemUnavailable = 6003,
    /// Item is not in the cart
    CartItemNotFound = 6101,

    // ==================== 7xxx: Review ====================
    /// Rating outside 1..=5
    InvalidRating = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Outbound mail delivery failed
    MailDeliveryFailed = 9501,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::EmailDomainNotAllowed => "Email domain is not allowed",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ManagerRequired => "Manager role is required",

            // Verification
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::VerificationCodeInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",
            ErrorCode::EmailNotVerified => "Email not verified",
            ErrorCode::PasswordTooWeak => "Password does not meet the strength requirements",
            ErrorCode::ResendTooSoon => "Please wait before requesting another code",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyServed => "Order has already been served",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::InvalidStatusTransition => "Order status transition is not allowed",

            // Slot
            ErrorCode::SlotNotFound => "Pickup slot is not available",
            ErrorCode::SlotFull => "Pickup slot is fully booked",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is currently unavailable",
            ErrorCode::CartItemNotFound => "Item is not in the cart",

            // Review
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailDeliveryFailed => "Failed to deliver email",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::EmailDomainNotAllowed),
            1009 => Ok(ErrorCode::EmailAlreadyRegistered),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ManagerRequired),

            // Verification
            3013 => Ok(ErrorCode::VerificationCodeExpired),
            3014 => Ok(ErrorCode::VerificationCodeInvalid),
            3015 => Ok(ErrorCode::TooManyAttempts),
            3016 => Ok(ErrorCode::EmailNotVerified),
            3018 => Ok(ErrorCode::PasswordTooWeak),
            3022 => Ok(ErrorCode::ResendTooSoon),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyServed),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::CartEmpty),
            4008 => Ok(ErrorCode::InvalidStatusTransition),

            // Slot
            5101 => Ok(ErrorCode::SlotNotFound),
            5102 => Ok(ErrorCode::SlotFull),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6003 => Ok(ErrorCode::MenuItemUnavailable),
            6101 => Ok(ErrorCode::CartItemNotFound),

            // Review
            7001 => Ok(ErrorCode::InvalidRating),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9501 => Ok(ErrorCode::MailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::CartItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::OrderAlreadyServed
            | Self::OrderAlreadyCancelled
            | Self::InvalidStatusTransition
            | Self::SlotFull => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::ManagerRequired
            | Self::EmailDomainNotAllowed => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyAttempts | Self::ResendTooSoon => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable (mail transport, client can retry)
            Self::MailDeliveryFailed => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

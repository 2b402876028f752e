//! AppError and the response envelope
//!
//! Every handler failure becomes an [`AppError`]; axum renders it as an
//! [`ApiResponse`] with the HTTP status mapped from its [`ErrorCode`].

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Structured error: code, display message, optional key/value context
///
/// ```
/// use shared::error::{AppError, ErrorCode};
///
/// let err = AppError::new(ErrorCode::SlotFull).with_detail("time", "12:30");
/// assert_eq!(err.http_status().as_u16(), 409);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Context for the client (offending field, ids, remaining attempts)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry; later keys overwrite earlier ones
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    // ========== General ==========

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Generic "<resource> not found"
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    // ========== Auth & permission ==========

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn manager_required() -> Self {
        Self::new(ErrorCode::ManagerRequired)
    }

    /// Password policy failure; the message joins the blocking issues
    pub fn weak_password(issues: Vec<String>) -> Self {
        let message = if issues.is_empty() {
            ErrorCode::PasswordTooWeak.message().to_string()
        } else {
            issues.join("; ")
        };
        Self::with_message(ErrorCode::PasswordTooWeak, message).with_detail("issues", issues)
    }

    // ========== Canteen ==========

    pub fn order_not_found(order_id: &str) -> Self {
        Self::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
    }

    pub fn menu_item_not_found(id: &str) -> Self {
        Self::new(ErrorCode::MenuItemNotFound).with_detail("id", id)
    }

    // ========== System ==========

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Response envelope shared by every endpoint
///
/// `{ "code": 0, "message": "OK", "data": ... }` on success,
/// `{ "code": 5102, "message": "...", "details": {...} }` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 0 on success, otherwise the [`ErrorCode`] value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn ok() -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        err.clone().into()
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();

        if self.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "Request rejected");
        }

        (status, axum::Json(ApiResponse::<()>::from(self))).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            None | Some(0) => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::CartEmpty);
        assert_eq!(err.message, "Cart is empty");
        assert!(err.details.is_none());
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::new(ErrorCode::VerificationCodeInvalid)
            .with_detail("remaining_attempts", 3)
            .with_detail("email", "asha@iiitkottayam.ac.in");

        let details = err.details.unwrap();
        assert_eq!(details["remaining_attempts"], 3);
        assert_eq!(details["email"], "asha@iiitkottayam.ac.in");
    }

    #[test]
    fn test_canteen_constructors() {
        let err = AppError::order_not_found("o-1");
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap()["order_id"], "o-1");

        let err = AppError::menu_item_not_found("dosa");
        assert_eq!(err.category(), ErrorCategory::Menu);

        assert_eq!(AppError::manager_required().http_status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("Notification").message, "Notification not found");
    }

    #[test]
    fn test_weak_password_carries_issues() {
        let err = AppError::weak_password(vec![
            "Password must be at least 6 characters long".to_string(),
            "Include at least one number".to_string(),
        ]);
        assert_eq!(err.code, ErrorCode::PasswordTooWeak);
        assert!(err.message.contains("at least 6 characters"));
        assert_eq!(err.details.unwrap()["issues"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_display_is_message() {
        let err = AppError::with_message(ErrorCode::SlotFull, "Pickup slot 12:30 is fully booked");
        assert_eq!(err.to_string(), "Pickup slot 12:30 is fully booked");
    }

    #[test]
    fn test_error_envelope() {
        let err = AppError::new(ErrorCode::SlotFull).with_detail("time", "12:30");
        let response = ApiResponse::<()>::error(&err);
        assert_eq!(response.code, Some(5102));
        assert!(response.data.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["details"]["time"], "12:30");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec!["12:30", "12:45"])).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "OK");
        assert_eq!(json["data"][1], "12:45");

        let parsed: ApiResponse<u32> =
            serde_json::from_str(r#"{"code":0,"message":"OK","data":42}"#).unwrap();
        assert_eq!(parsed.data, Some(42));
    }
}

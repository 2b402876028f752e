//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，本模块补充 handler 层的辅助函数：
//! - [`validate_payload`] - 将 `validator` 的校验结果转换为 [`AppError`]
//! - [`ok`] - 包装成功响应

use axum::Json;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 校验请求体，失败时返回 400 并附带字段级错误
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut err = AppError::validation(format!("Invalid request: {errors}"));
    for (field, field_errors) in errors.field_errors() {
        let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
        err = err.with_detail(field.to_string(), codes);
    }
    err
}

/// 包装成功响应
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 包装带自定义消息的成功响应
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

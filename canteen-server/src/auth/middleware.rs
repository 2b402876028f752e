//! 认证中间件
//!
//! 为 JWT 认证和角色检查提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 无需登录的 API 路径
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/health",
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/send-otp",
    "/api/auth/verify-otp",
    "/api/auth/reset-password",
    "/api/auth/update-password",
    "/api/auth/password-check",
];

/// 菜单浏览 (GET) 无需登录
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if PUBLIC_API_ROUTES.contains(&path) {
        return true;
    }
    method == http::Method::GET && (path == "/api/menu" || path.starts_with("/api/menu/"))
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - 注册、登录、验证码、找回密码等 [`PUBLIC_API_ROUTES`]
/// - `GET /api/menu*` (浏览菜单)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate_bearer(&state.get_jwt_service(), req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 校验 `Authorization: Bearer <token>`，失败时写 security 日志
pub(crate) fn authenticate_bearer(
    jwt_service: &JwtService,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = uri.path().to_string());
        return Err(AppError::not_authenticated());
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    jwt_service
        .validate_token(token)
        .map(CurrentUser::from)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = uri.path().to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })
}

/// 管理员中间件 - 要求 manager 角色
///
/// 需挂在 [`require_auth`] 之后；非管理员返回 403 ManagerRequired
pub async fn require_manager(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_manager() {
        security_log!(
            "WARN",
            "manager_required",
            user_id = user.id.clone(),
            user_role = user.role.as_str(),
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::manager_required());
    }

    Ok(next.run(req).await)
}

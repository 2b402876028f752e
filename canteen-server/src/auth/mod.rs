//! 认证授权模块
//!
//! 提供账号、JWT 认证和中间件：
//! - [`AuthService`] - 注册、验证码、登录、找回密码
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_manager`] - 管理员检查中间件

pub mod extractor;
pub mod jwt;
pub mod mailer;
pub mod middleware;
pub mod otp;
pub mod password;
pub mod service;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use mailer::{LogMailer, MailError, Mailer, MemoryMailer};
pub use middleware::{require_auth, require_manager};
pub use otp::OtpPurpose;
pub use password::evaluate_password;
pub use service::{AuthService, StoredUser};

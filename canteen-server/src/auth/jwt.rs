//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::UserRole;
use thiserror::Error;

/// 最短密钥长度
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    /// 开发用配置: 每次启动随机生成密钥，重启后旧令牌全部失效
    fn default() -> Self {
        Self {
            secret: generate_secure_printable_jwt_secret(),
            expiration_minutes: 1440, // 默认 24 小时
            issuer: "canteen-server".to_string(),
            audience: "canteen-clients".to_string(),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    pub email: String,
    /// 显示名称
    pub name: String,
    /// 角色: student | manager
    pub role: UserRole,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // 随机数生成失败时退回固定开发密钥
        return "CanteenServerDevelopmentOnlySecretKey-0000".to_string();
    }
    bytes
        .iter()
        .map(|b| ALLOWED[*b as usize % ALLOWED.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Result<Self, JwtError> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::ConfigError(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} characters long"
            )));
        }
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// 为用户生成新令牌
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
///
/// # 示例
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.is_manager() {
///         // 后台操作
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否食堂管理员
    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::default()).expect("Failed to create test JWT service")
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service
            .generate_token("user123", "asha@iiitkottayam.ac.in", "Asha", UserRole::Student)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "asha@iiitkottayam.ac.in");
        assert_eq!(claims.name, "Asha");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service()
            .generate_token("u", "e", "n", UserRole::Manager)
            .unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = JwtConfig {
            secret: "short".into(),
            ..JwtConfig::default()
        };
        assert!(matches!(
            JwtService::with_config(config),
            Err(JwtError::ConfigError(_))
        ));
    }

    #[test]
    fn test_printable_secret() {
        let key1 = generate_secure_printable_jwt_secret();
        let key2 = generate_secure_printable_jwt_secret();
        assert_eq!(key1.len(), 64);
        assert_ne!(key1, key2);
        assert!(key1.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = service();
        let token = service
            .generate_token("m1", "canteen@iiitkottayam.ac.in", "Canteen", UserRole::Manager)
            .unwrap();
        let user = CurrentUser::from(service.validate_token(&token).unwrap());
        assert!(user.is_manager());
        assert_eq!(user.id, "m1");
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}

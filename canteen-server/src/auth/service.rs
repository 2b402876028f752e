//! 账号服务
//!
//! 注册 (仅校园邮箱)、邮箱验证码、登录签发 JWT、找回密码、管理员账号初始化。
//! 用户记录以规范化后的邮箱为 key 存在 `user:` 前缀下。

use serde::{Deserialize, Serialize};
use shared::client::{LoginResponse, RegisterRequest};
use shared::error::{AppError, ErrorCode};
use shared::models::{PasswordReport, UserInfo, UserRole};
use shared::util::{new_id, now_millis};
use std::sync::Arc;

use super::jwt::{CurrentUser, JwtService};
use super::mailer::Mailer;
use super::otp::{OtpPurpose, OtpStore};
use super::password::{evaluate_password, hash_password, verify_password};
use crate::security_log;
use crate::storage::RecordStore;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, is_campus_email, normalize_email, validate_required_text,
};

const KEY_PREFIX: &str = "user:";

fn key(email: &str) -> String {
    format!("{KEY_PREFIX}{email}")
}

/// Persisted account, including the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub student_id: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub password_hash: String,
    #[serde(default)]
    pub loyalty_points: u32,
    pub created_at: i64,
}

impl StoredUser {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            student_id: self.student_id.clone(),
            role: self.role,
            is_verified: self.is_verified,
            loyalty_points: self.loyalty_points,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: RecordStore,
    otps: OtpStore,
    jwt: Arc<JwtService>,
    mailer: Arc<dyn Mailer>,
    campus_domain: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("campus_domain", &self.campus_domain)
            .finish_non_exhaustive()
    }
}

fn hash_or_internal(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::internal("Failed to hash password")
    })
}

impl AuthService {
    pub fn new(
        store: RecordStore,
        jwt: Arc<JwtService>,
        mailer: Arc<dyn Mailer>,
        campus_domain: impl Into<String>,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            otps: OtpStore::new(store.clone(), otp_ttl_minutes),
            store,
            jwt,
            mailer,
            campus_domain: campus_domain.into(),
        }
    }

    pub fn campus_domain(&self) -> &str {
        &self.campus_domain
    }

    fn require_campus_email(&self, email: &str) -> AppResult<()> {
        if !is_campus_email(email, &self.campus_domain) {
            return Err(AppError::with_message(
                ErrorCode::EmailDomainNotAllowed,
                format!("Only @{} email addresses are allowed", self.campus_domain.trim_start_matches('@')),
            ));
        }
        Ok(())
    }

    pub fn find_user(&self, email: &str) -> AppResult<Option<StoredUser>> {
        Ok(self.store.get(&key(&normalize_email(email)))?)
    }

    async fn send_code(&self, email: &str, purpose: OtpPurpose) -> AppResult<()> {
        let code = self.otps.issue(email, purpose, now_millis())?;
        self.mailer
            .send_code(email, &code, purpose)
            .await
            .map_err(|e| {
                tracing::error!(to = email, error = %e, "Failed to send verification code");
                AppError::with_message(ErrorCode::MailDeliveryFailed, e.to_string())
            })
    }

    /// Create an unverified student account and mail a verification code
    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserInfo> {
        let email = normalize_email(&req.email);
        validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
        self.require_campus_email(&email)?;

        let report = evaluate_password(&req.password);
        if !report.is_valid {
            return Err(AppError::weak_password(report.issues));
        }
        if self.find_user(&email)?.is_some() {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
        }

        let user = StoredUser {
            id: new_id(),
            name: req.name.trim().to_string(),
            email: email.clone(),
            student_id: req
                .student_id
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            role: UserRole::Student,
            is_verified: false,
            password_hash: hash_or_internal(&req.password)?,
            loyalty_points: 0,
            created_at: now_millis(),
        };
        self.store.put(&key(&email), &user)?;
        security_log!("INFO", "user_registered", user_id = user.id.clone(), email = email.clone());

        self.send_code(&email, OtpPurpose::EmailVerification).await?;
        Ok(user.info())
    }

    /// Resend the email verification code
    pub async fn send_otp(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let user = self
            .find_user(&email)?
            .ok_or_else(|| AppError::not_found("User"))?;
        if user.is_verified {
            return Err(AppError::invalid_request("Email is already verified"));
        }
        self.send_code(&email, OtpPurpose::EmailVerification).await
    }

    pub fn verify_otp(&self, email: &str, code: &str) -> AppResult<UserInfo> {
        let email = normalize_email(email);
        if self.find_user(&email)?.is_none() {
            return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
        }
        if let Err(e) = self
            .otps
            .verify(&email, OtpPurpose::EmailVerification, code, now_millis())
        {
            security_log!("WARN", "otp_failed", email = email.clone(), code = e.code.code());
            return Err(e);
        }

        let user = self
            .store
            .update::<StoredUser, AppError, _>(&key(&email), |user| {
                user.is_verified = true;
                Ok(())
            })?
            .ok_or_else(|| AppError::not_found("User"))?;
        security_log!("INFO", "email_verified", user_id = user.id.clone());
        Ok(user.info())
    }

    /// Check credentials and issue a JWT
    ///
    /// Unknown email and wrong password produce the same error.
    pub fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let email = normalize_email(email);
        let user = match self.find_user(&email)? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            Some(_) => {
                security_log!("WARN", "login_failed", email = email.clone(), reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            None => {
                security_log!("WARN", "login_failed", email = email.clone(), reason = "user_not_found");
                return Err(AppError::invalid_credentials());
            }
        };

        if !user.is_verified {
            return Err(AppError::new(ErrorCode::EmailNotVerified));
        }

        let token = self
            .jwt
            .generate_token(&user.id, &user.email, &user.name, user.role)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

        security_log!("INFO", "login_success", user_id = user.id.clone(), role = user.role.as_str());
        Ok(LoginResponse {
            token,
            user: user.info(),
        })
    }

    /// Mail a reset code when the account exists; unknown emails get the same answer
    pub async fn reset_password(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        self.require_campus_email(&email)?;
        if self.find_user(&email)?.is_none() {
            tracing::debug!(email = %email, "Password reset requested for unknown email");
            return Ok(());
        }
        self.send_code(&email, OtpPurpose::PasswordReset).await
    }

    pub fn update_password(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let report = evaluate_password(new_password);
        if !report.is_valid {
            return Err(AppError::weak_password(report.issues));
        }
        if self.find_user(&email)?.is_none() {
            return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
        }
        self.otps
            .verify(&email, OtpPurpose::PasswordReset, code, now_millis())?;

        let password_hash = hash_or_internal(new_password)?;
        let user = self
            .store
            .update::<StoredUser, AppError, _>(&key(&email), |user| {
                user.password_hash = password_hash;
                // Receiving the code proves ownership of the mailbox
                user.is_verified = true;
                Ok(())
            })?
            .ok_or_else(|| AppError::not_found("User"))?;
        security_log!("INFO", "password_updated", user_id = user.id.clone());
        Ok(())
    }

    /// Tokens are stateless; logout only leaves a trace in the security log
    pub fn logout(&self, user: &CurrentUser) {
        security_log!("INFO", "logout", user_id = user.id.clone(), email = user.email.clone());
    }

    pub fn check_password(&self, password: &str) -> PasswordReport {
        evaluate_password(password)
    }

    pub fn me(&self, user: &CurrentUser) -> AppResult<UserInfo> {
        self.find_user(&user.email)?
            .map(|u| u.info())
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Make sure the configured manager account exists and can log in
    ///
    /// An existing account with that email is promoted to manager and its
    /// password replaced. Returns the manager's user id.
    pub fn ensure_manager(&self, email: &str, password: &str, name: &str) -> AppResult<String> {
        let email = normalize_email(email);
        let password_hash = hash_or_internal(password)?;

        if let Some(user) = self
            .store
            .update::<StoredUser, AppError, _>(&key(&email), |user| {
                user.role = UserRole::Manager;
                user.is_verified = true;
                user.password_hash = password_hash.clone();
                Ok(())
            })?
        {
            tracing::info!(email = %email, "Manager account refreshed");
            return Ok(user.id);
        }

        let user = StoredUser {
            id: new_id(),
            name: name.to_string(),
            email: email.clone(),
            student_id: None,
            role: UserRole::Manager,
            is_verified: true,
            password_hash,
            loyalty_points: 0,
            created_at: now_millis(),
        };
        self.store.put(&key(&email), &user)?;
        tracing::info!(email = %email, "Manager account created");
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests;

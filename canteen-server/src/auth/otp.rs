//! 邮箱验证码 (OTP)
//!
//! - 6 位数字，默认 10 分钟有效
//! - 同一邮箱同一用途 60 秒内不能重发
//! - 最多尝试 5 次，验证成功后立即作废
//! - 只保存 argon2 哈希，不保存明文

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::password::{hash_password, verify_password};
use crate::storage::RecordStore;
use crate::utils::AppResult;

const KEY_PREFIX: &str = "otp:";

pub const MAX_ATTEMPTS: u32 = 5;

pub const RESEND_COOLDOWN_MS: i64 = 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    EmailVerification,
    PasswordReset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::EmailVerification => "email_verification",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code_hash: String,
    pub expires_at: i64,
    pub attempts: u32,
    pub sent_at: i64,
    pub consumed: bool,
}

fn key(email: &str, purpose: OtpPurpose) -> String {
    format!("{KEY_PREFIX}{}:{email}", purpose.as_str())
}

pub fn generate_code() -> String {
    use rand::Rng;
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

#[derive(Debug, Clone)]
pub struct OtpStore {
    store: RecordStore,
    ttl_ms: i64,
}

impl OtpStore {
    pub fn new(store: RecordStore, ttl_minutes: i64) -> Self {
        Self {
            store,
            ttl_ms: ttl_minutes * 60 * 1000,
        }
    }

    /// Issue a fresh code, replacing any previous one; returns the plain code for mailing
    pub fn issue(&self, email: &str, purpose: OtpPurpose, now: i64) -> AppResult<String> {
        if let Some(existing) = self.store.get::<OtpRecord>(&key(email, purpose))?
            && !existing.consumed
            && now - existing.sent_at < RESEND_COOLDOWN_MS
        {
            let wait = (RESEND_COOLDOWN_MS - (now - existing.sent_at)) / 1000 + 1;
            return Err(AppError::new(ErrorCode::ResendTooSoon).with_detail("retry_after_secs", wait));
        }

        let code = generate_code();
        let code_hash = hash_password(&code).map_err(|e| {
            tracing::error!(error = %e, "Failed to hash verification code");
            AppError::internal("Failed to create verification code")
        })?;
        let record = OtpRecord {
            email: email.to_string(),
            purpose,
            code_hash,
            expires_at: now + self.ttl_ms,
            attempts: 0,
            sent_at: now,
            consumed: false,
        };
        self.store.put(&key(email, purpose), &record)?;
        Ok(code)
    }

    /// Check a code; a wrong guess still counts as an attempt
    pub fn verify(&self, email: &str, purpose: OtpPurpose, code: &str, now: i64) -> AppResult<()> {
        let mut matched = false;
        let mut remaining = 0;
        let updated = self
            .store
            .update::<OtpRecord, AppError, _>(&key(email, purpose), |record| {
                if record.consumed {
                    return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
                }
                if now > record.expires_at {
                    return Err(AppError::new(ErrorCode::VerificationCodeExpired));
                }
                if record.attempts >= MAX_ATTEMPTS {
                    return Err(AppError::new(ErrorCode::TooManyAttempts));
                }
                record.attempts += 1;
                remaining = MAX_ATTEMPTS - record.attempts;
                matched = verify_password(code, &record.code_hash);
                if matched {
                    record.consumed = true;
                }
                Ok(())
            })?;

        match updated {
            None => Err(AppError::new(ErrorCode::VerificationCodeInvalid)),
            Some(_) if matched => Ok(()),
            Some(_) => Err(AppError::new(ErrorCode::VerificationCodeInvalid)
                .with_detail("remaining_attempts", remaining)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "asha@iiitkottayam.ac.in";
    const T0: i64 = 1_700_000_000_000;

    fn otp_store() -> OtpStore {
        OtpStore::new(RecordStore::open_in_memory().unwrap(), 10)
    }

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_is_single_use() {
        let otps = otp_store();
        let code = otps.issue(EMAIL, OtpPurpose::EmailVerification, T0).unwrap();
        otps.verify(EMAIL, OtpPurpose::EmailVerification, &code, T0 + 1000)
            .unwrap();
        let err = otps
            .verify(EMAIL, OtpPurpose::EmailVerification, &code, T0 + 2000)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    #[test]
    fn test_purposes_are_separate() {
        let otps = otp_store();
        let code = otps.issue(EMAIL, OtpPurpose::PasswordReset, T0).unwrap();
        let err = otps
            .verify(EMAIL, OtpPurpose::EmailVerification, &code, T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    #[test]
    fn test_expired_code() {
        let otps = otp_store();
        let code = otps.issue(EMAIL, OtpPurpose::EmailVerification, T0).unwrap();
        let err = otps
            .verify(EMAIL, OtpPurpose::EmailVerification, &code, T0 + 10 * 60 * 1000 + 1)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeExpired);
    }

    #[test]
    fn test_resend_cooldown() {
        let otps = otp_store();
        otps.issue(EMAIL, OtpPurpose::EmailVerification, T0).unwrap();
        let err = otps
            .issue(EMAIL, OtpPurpose::EmailVerification, T0 + 30_000)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResendTooSoon);
        assert!(
            otps.issue(EMAIL, OtpPurpose::EmailVerification, T0 + RESEND_COOLDOWN_MS)
                .is_ok()
        );
    }

    #[test]
    fn test_attempts_are_limited() {
        let otps = otp_store();
        let code = otps.issue(EMAIL, OtpPurpose::EmailVerification, T0).unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for i in 1..=MAX_ATTEMPTS {
            let err = otps
                .verify(EMAIL, OtpPurpose::EmailVerification, wrong, T0)
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
            let remaining = err.details.as_ref().unwrap()["remaining_attempts"].as_u64();
            assert_eq!(remaining, Some(u64::from(MAX_ATTEMPTS - i)));
        }

        // Even the right code is refused once attempts are used up
        let err = otps
            .verify(EMAIL, OtpPurpose::EmailVerification, &code, T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyAttempts);
    }

    #[test]
    fn test_unknown_email() {
        let err = otp_store()
            .verify("nobody@iiitkottayam.ac.in", OtpPurpose::PasswordReset, "123456", T0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }
}

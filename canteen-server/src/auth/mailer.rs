//! 验证码邮件发送
//!
//! [`Mailer`] 是发送边界；默认的 [`LogMailer`] 只把验证码写进日志，
//! [`MemoryMailer`] 保存在内存里供本地调试和测试读取。

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use super::otp::OtpPurpose;

#[derive(Debug, Error)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), MailError>;
}

/// Writes the code to the log instead of sending mail
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), MailError> {
        tracing::info!(to = email, code, purpose = purpose.as_str(), "Verification code issued");
        Ok(())
    }
}

/// A mail that [`MemoryMailer`] accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub email: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// Keeps every sent code in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<SentCode>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent code sent to `email` for `purpose`
    pub fn last_code(&self, email: &str, purpose: OtpPurpose) -> Option<String> {
        self.outbox
            .lock()
            .iter()
            .rev()
            .find(|m| m.email == email && m.purpose == purpose)
            .map(|m| m.code.clone())
    }

    pub fn sent(&self) -> Vec<SentCode> {
        self.outbox.lock().clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), MailError> {
        self.outbox.lock().push(SentCode {
            email: email.to_string(),
            code: code.to_string(),
            purpose,
        });
        Ok(())
    }
}

//! Notification Model

use serde::{Deserialize, Serialize};

/// Notification severity, drives client styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A message in a user's mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: i64,
}

/// Unread badge payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread: usize,
}

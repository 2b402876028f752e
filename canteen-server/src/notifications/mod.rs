//! 通知信箱
//!
//! 下单与每次状态变更都会给订单所属用户写一条通知；之后只允许修改已读标记。

use shared::error::AppError;
use shared::models::{Notification, NotificationKind};
use shared::util::{new_id, now_millis};

use crate::storage::RecordStore;
use crate::utils::AppResult;

const KEY_PREFIX: &str = "notification:";

/// Notifications keyed by `notification:<user_id>:<id>` so one user's mailbox is a prefix scan
fn user_prefix(user_id: &str) -> String {
    format!("{KEY_PREFIX}{user_id}:")
}

fn key(user_id: &str, id: &str) -> String {
    format!("{KEY_PREFIX}{user_id}:{id}")
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    store: RecordStore,
}

impl NotificationService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn push(
        &self,
        user_id: &str,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> AppResult<Notification> {
        let notification = Notification {
            id: new_id(),
            user_id: user_id.to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: now_millis(),
        };
        self.store
            .put(&key(user_id, &notification.id), &notification)?;
        tracing::debug!(user_id, title = %notification.title, "Notification pushed");
        Ok(notification)
    }

    /// Newest first
    pub fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        let mut items: Vec<Notification> = self.store.scan(&user_prefix(user_id))?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    pub fn unread_count(&self, user_id: &str) -> AppResult<usize> {
        Ok(self
            .store
            .scan::<Notification>(&user_prefix(user_id))?
            .iter()
            .filter(|n| !n.read)
            .count())
    }

    /// Only the owning user can mark a notification; other users see "not found"
    pub fn mark_read(&self, user_id: &str, id: &str) -> AppResult<Notification> {
        self.store
            .update::<Notification, AppError, _>(&key(user_id, id), |n| {
                n.read = true;
                Ok(())
            })?
            .ok_or_else(|| AppError::not_found("Notification"))
    }

    /// Returns how many were flipped
    pub fn mark_all_read(&self, user_id: &str) -> AppResult<usize> {
        let mut flipped = 0;
        for n in self.store.scan::<Notification>(&user_prefix(user_id))? {
            if !n.read {
                self.mark_read(user_id, &n.id)?;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

//! 通知存储操作

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::notifications::entities::GradeNotification;

impl MemoryStorage {
    pub async fn create_notification_impl(
        &self,
        notification: GradeNotification,
    ) -> Result<GradeNotification> {
        if self.notifications.contains_key(&notification.id) {
            return Err(GradingError::conflict(format!(
                "通知已存在: {}",
                notification.id
            )));
        }
        self.notifications
            .insert(notification.id.clone(), notification.clone());
        Ok(notification)
    }

    /// 列出用户通知（最新的在前）
    pub async fn list_notifications_impl(&self, user_id: &str) -> Result<Vec<GradeNotification>> {
        let mut notifications: Vec<GradeNotification> = self
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| n.value().clone())
            .collect();
        notifications.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notifications)
    }

    pub async fn mark_notification_read_impl(&self, id: &str) -> Result<bool> {
        match self.notifications.get_mut(id) {
            Some(mut entry) => {
                entry.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

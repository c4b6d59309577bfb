//! 评分通知查询与已读标记

use std::sync::Arc;

use tracing::debug;

use crate::errors::{GradingError, Result};
use crate::models::notifications::entities::GradeNotification;
use crate::services::grades::GradeService;

pub struct NotificationService {
    grades: Arc<GradeService>,
}

impl NotificationService {
    pub fn new(grades: Arc<GradeService>) -> Self {
        Self { grades }
    }

    /// 用户的通知，最新的在前
    pub async fn list(&self, user_id: &str) -> Result<Vec<GradeNotification>> {
        self.grades.storage().list_notifications(user_id).await
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        let notifications = self.list(user_id).await?;
        Ok(notifications.iter().filter(|n| !n.read).count())
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        if !self.grades.storage().mark_notification_read(id).await? {
            return Err(GradingError::not_found(format!("通知不存在: {id}")));
        }
        debug!("Notification {} marked as read", id);
        Ok(())
    }
}

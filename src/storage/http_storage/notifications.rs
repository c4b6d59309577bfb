//! 通知接口

use reqwest::Method;

use super::{HttpStorage, not_found_as_none};
use crate::errors::Result;
use crate::models::notifications::entities::GradeNotification;

impl HttpStorage {
    pub async fn create_notification_impl(
        &self,
        notification: GradeNotification,
    ) -> Result<GradeNotification> {
        let builder = self
            .request(Method::POST, "/grades/notifications")
            .json(&notification);
        self.send_data(builder).await
    }

    pub async fn list_notifications_impl(&self, user_id: &str) -> Result<Vec<GradeNotification>> {
        let builder = self.request(Method::GET, &format!("/grades/notifications/{user_id}"));
        Ok(self.send(builder).await?.unwrap_or_default())
    }

    pub async fn mark_notification_read_impl(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::PUT, &format!("/grades/notifications/{id}/read"));
        let marked = not_found_as_none(self.execute(builder).await)?;
        Ok(marked.is_some())
    }
}

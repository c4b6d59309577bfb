//! 内存存储实现
//!
//! 基于 DashMap 的进程内存储，默认后端，测试也使用它。

mod disputes;
mod export;
mod grades;
mod notifications;
mod reviews;
mod templates;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::Result;
use crate::models::{
    disputes::entities::GradeDispute,
    grades::{
        entities::{Grade, GradeHistory},
        requests::{GradeExportRequest, GradeFilter},
    },
    notifications::entities::GradeNotification,
    reviews::entities::GradeReview,
    templates::entities::GradeTemplate,
};
use crate::storage::Storage;

/// 内存存储
#[derive(Default)]
pub struct MemoryStorage {
    pub(crate) grades: DashMap<String, Grade>,
    pub(crate) history: DashMap<String, Vec<GradeHistory>>,
    pub(crate) reviews: DashMap<String, GradeReview>,
    pub(crate) disputes: DashMap<String, GradeDispute>,
    pub(crate) templates: DashMap<String, GradeTemplate>,
    pub(crate) notifications: DashMap<String, GradeNotification>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        tracing::debug!("In-memory storage initialized");
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    // 评分模块
    async fn list_grades(&self, filter: &GradeFilter) -> Result<Vec<Grade>> {
        self.list_grades_impl(filter).await
    }

    async fn get_grade(&self, id: &str) -> Result<Option<Grade>> {
        self.get_grade_impl(id).await
    }

    async fn create_grade(&self, grade: Grade) -> Result<Grade> {
        self.create_grade_impl(grade).await
    }

    async fn update_grade(&self, grade: Grade) -> Result<Option<Grade>> {
        self.update_grade_impl(grade).await
    }

    async fn delete_grade(&self, id: &str) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    async fn append_history(&self, entry: GradeHistory) -> Result<GradeHistory> {
        self.append_history_impl(entry).await
    }

    async fn list_history(&self, grade_id: &str) -> Result<Vec<GradeHistory>> {
        self.list_history_impl(grade_id).await
    }

    // 复核模块
    async fn create_review(&self, review: GradeReview) -> Result<GradeReview> {
        self.create_review_impl(review).await
    }

    async fn get_review(&self, id: &str) -> Result<Option<GradeReview>> {
        self.get_review_impl(id).await
    }

    async fn update_review(&self, review: GradeReview) -> Result<Option<GradeReview>> {
        self.update_review_impl(review).await
    }

    async fn list_reviews(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>> {
        self.list_reviews_impl(grade_id).await
    }

    // 申诉模块
    async fn create_dispute(&self, dispute: GradeDispute) -> Result<GradeDispute> {
        self.create_dispute_impl(dispute).await
    }

    async fn get_dispute(&self, id: &str) -> Result<Option<GradeDispute>> {
        self.get_dispute_impl(id).await
    }

    async fn update_dispute(&self, dispute: GradeDispute) -> Result<Option<GradeDispute>> {
        self.update_dispute_impl(dispute).await
    }

    async fn list_disputes(&self, grade_id: Option<&str>) -> Result<Vec<GradeDispute>> {
        self.list_disputes_impl(grade_id).await
    }

    // 模板模块
    async fn create_template(&self, template: GradeTemplate) -> Result<GradeTemplate> {
        self.create_template_impl(template).await
    }

    async fn get_template(&self, id: &str) -> Result<Option<GradeTemplate>> {
        self.get_template_impl(id).await
    }

    async fn list_templates(&self, course_id: &str) -> Result<Vec<GradeTemplate>> {
        self.list_templates_impl(course_id).await
    }

    // 通知模块
    async fn create_notification(
        &self,
        notification: GradeNotification,
    ) -> Result<GradeNotification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<GradeNotification>> {
        self.list_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: &str) -> Result<bool> {
        self.mark_notification_read_impl(id).await
    }

    // 导出
    async fn export_grades(&self, request: &GradeExportRequest) -> Result<Vec<u8>> {
        self.export_grades_impl(request).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::models::grades::entities::Grade;

    pub fn grade(id: &str, assignment_id: &str, student_id: &str, score: f64, day: u32) -> Grade {
        let at = Utc.with_ymd_and_hms(2025, 3, day, 8, 0, 0).unwrap();
        Grade {
            id: id.to_string(),
            submission_id: format!("sub-{id}"),
            assignment_id: assignment_id.to_string(),
            student_id: student_id.to_string(),
            graded_by: "t1".to_string(),
            graded_at: at,
            score,
            max_score: 100.0,
            feedback: format!("feedback {id}"),
            rubric_id: None,
            rubric_grades: vec![],
            created_at: at,
            updated_at: at,
        }
    }
}

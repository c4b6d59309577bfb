//! 存储边界
//!
//! 持久化由远端后端负责，引擎通过 `Storage` trait 访问。
//! 记录（ID、时间戳）由引擎构造后整体写入，存储层原样保存并返回保存后的结果。

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::errors::{GradingError, Result};
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

pub mod http_storage;
pub mod memory_storage;
pub mod register;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 评分管理方法
    // 按条件列出评分（按评分时间倒序）
    async fn list_grades(&self, filter: &GradeFilter) -> Result<Vec<Grade>>;
    // 通过ID获取评分
    async fn get_grade(&self, id: &str) -> Result<Option<Grade>>;
    // 创建评分
    async fn create_grade(&self, grade: Grade) -> Result<Grade>;
    // 覆盖更新评分，不存在时返回 None
    async fn update_grade(&self, grade: Grade) -> Result<Option<Grade>>;
    // 删除评分
    async fn delete_grade(&self, id: &str) -> Result<bool>;

    /// 分数历史
    // 追加一条历史记录
    async fn append_history(&self, entry: GradeHistory) -> Result<GradeHistory>;
    // 列出某个评分的历史（按时间正序）
    async fn list_history(&self, grade_id: &str) -> Result<Vec<GradeHistory>>;

    /// 复核管理方法
    async fn create_review(&self, review: GradeReview) -> Result<GradeReview>;
    async fn get_review(&self, id: &str) -> Result<Option<GradeReview>>;
    async fn update_review(&self, review: GradeReview) -> Result<Option<GradeReview>>;
    async fn list_reviews(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>>;

    /// 申诉管理方法
    async fn create_dispute(&self, dispute: GradeDispute) -> Result<GradeDispute>;
    async fn get_dispute(&self, id: &str) -> Result<Option<GradeDispute>>;
    async fn update_dispute(&self, dispute: GradeDispute) -> Result<Option<GradeDispute>>;
    async fn list_disputes(&self, grade_id: Option<&str>) -> Result<Vec<GradeDispute>>;

    /// 评分模板
    async fn create_template(&self, template: GradeTemplate) -> Result<GradeTemplate>;
    async fn get_template(&self, id: &str) -> Result<Option<GradeTemplate>>;
    async fn list_templates(&self, course_id: &str) -> Result<Vec<GradeTemplate>>;

    /// 通知
    async fn create_notification(&self, notification: GradeNotification) -> Result<GradeNotification>;
    // 列出用户的通知（按创建时间倒序）
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<GradeNotification>>;
    // 标记已读，不存在时返回 false
    async fn mark_notification_read(&self, id: &str) -> Result<bool>;

    /// 导出（内容对引擎不透明）
    async fn export_grades(&self, request: &GradeExportRequest) -> Result<Vec<u8>>;
}

/// 根据配置创建存储后端
///
/// 找不到配置的插件时回退到内存存储。
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    let storage_type = config.storage_type.as_str();

    if let Some(constructor) = register::get_storage_plugin(storage_type) {
        return constructor(config.clone()).await;
    }

    tracing::warn!("Storage backend '{}' not found in registry", storage_type);
    if storage_type != "memory"
        && let Some(fallback) = register::get_storage_plugin("memory")
    {
        tracing::warn!("Falling back to in-memory storage");
        return fallback(config.clone()).await;
    }

    Err(GradingError::storage_plugin_not_found(format!(
        "No storage backend available (tried: {storage_type})"
    )))
}

pub mod bulk;
pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod history;
pub mod import;
pub mod list;
pub mod update;
pub mod validate;

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::cache::{ObjectCache, statistics_key};
use crate::config::GradingConfig;
use crate::errors::Result;
use crate::models::grades::{
    entities::{Grade, GradeHistory},
    requests::{
        GradeBulkUpdate, GradeCreateData, GradeExportRequest, GradeFilter, GradeImportRequest,
        GradeUpdateData,
    },
    responses::{BulkUpdateResult, GradeValidationReport, ImportSummary},
};
use crate::models::notifications::entities::{GradeNotification, NotificationType};
use crate::services::events::{EventBus, GradeEvent, Subscription};
use crate::storage::Storage;

/// 评分记录管理
///
/// 持有最近读写过的评分作为工作集，持久化交给存储后端。
pub struct GradeService {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    events: Arc<EventBus>,
    config: GradingConfig,
    working_set: DashMap<String, Grade>,
}

impl GradeService {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        events: Arc<EventBus>,
        config: GradingConfig,
    ) -> Self {
        Self {
            storage,
            cache,
            events,
            config,
            working_set: DashMap::new(),
        }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub(crate) fn remember(&self, grade: &Grade) {
        self.working_set.insert(grade.id.clone(), grade.clone());
    }

    pub(crate) fn cached(&self, id: &str) -> Option<Grade> {
        self.working_set.get(id).map(|g| g.value().clone())
    }

    pub(crate) fn forget(&self, id: &str) {
        self.working_set.remove(id);
    }

    /// 变更成功后：失效该作业的统计缓存并通知订阅者
    pub(crate) async fn after_mutation(&self, assignment_id: &str, event: GradeEvent) {
        self.cache.remove(&statistics_key(assignment_id)).await;
        self.events.publish(&event);
    }

    /// 给用户写一条通知，失败只记日志不影响主流程
    pub(crate) async fn notify(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        grade_id: &str,
        message: String,
    ) {
        if user_id.trim().is_empty() {
            return;
        }
        let notification = GradeNotification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            notification_type,
            grade_id: grade_id.to_string(),
            message,
            read: false,
            created_at: Utc::now(),
        };
        if let Err(e) = self.storage.create_notification(notification).await {
            warn!(
                "Failed to store {} notification for user {}: {}",
                notification_type, user_id, e
            );
        }
    }

    // 创建评分
    pub async fn create(&self, data: GradeCreateData, graded_by: &str) -> Result<Grade> {
        create::create_grade(self, data, graded_by).await
    }

    // 更新评分
    pub async fn update(&self, data: GradeUpdateData, changed_by: &str) -> Result<Grade> {
        update::update_grade(self, data, changed_by).await
    }

    // 删除评分
    pub async fn delete(&self, id: &str) -> Result<()> {
        delete::delete_grade(self, id).await
    }

    // 获取评分
    pub async fn get(&self, id: &str) -> Result<Grade> {
        get::get_grade(self, id).await
    }

    // 列出评分
    pub async fn list(&self, filter: &GradeFilter) -> Result<Vec<Grade>> {
        list::list_grades(self, filter).await
    }

    // 批量更新
    pub async fn bulk_update(
        &self,
        bulk: &GradeBulkUpdate,
        changed_by: &str,
    ) -> Result<BulkUpdateResult> {
        bulk::bulk_update(self, bulk, changed_by).await
    }

    // 分数历史
    pub async fn history(&self, id: &str) -> Result<Vec<GradeHistory>> {
        history::grade_history(self, id).await
    }

    // 预校验
    pub fn validate(&self, data: &GradeCreateData) -> GradeValidationReport {
        validate::validate_grade_data(data)
    }

    // 导入
    pub async fn import(&self, request: &GradeImportRequest, graded_by: &str) -> Result<ImportSummary> {
        import::import_grades(self, request, graded_by).await
    }

    // 导出
    pub async fn export(&self, request: &GradeExportRequest) -> Result<Vec<u8>> {
        export::export_grades(self, request).await
    }

    // 订阅变更事件
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GradeEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    GradeSubmitted,   // 学生收到新评分
    GradeUpdated,     // 学生的分数被修改
    ReviewRequested,  // 阅卷人收到复核申请
    DisputeSubmitted, // 阅卷人收到申诉
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::GradeSubmitted => write!(f, "grade_submitted"),
            NotificationType::GradeUpdated => write!(f, "grade_updated"),
            NotificationType::ReviewRequested => write!(f, "review_requested"),
            NotificationType::DisputeSubmitted => write!(f, "dispute_submitted"),
        }
    }
}

// 按用户持久化的评分通知
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct GradeNotification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub grade_id: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

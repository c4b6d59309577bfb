use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 申诉状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dispute.ts")]
pub enum DisputeStatus {
    Pending,     // 已提交
    UnderReview, // 处理中
    Resolved,    // 已解决
}

impl DisputeStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, DisputeStatus::Resolved)
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisputeStatus::Pending => write!(f, "pending"),
            DisputeStatus::UnderReview => write!(f, "under_review"),
            DisputeStatus::Resolved => write!(f, "resolved"),
        }
    }
}

// 学生成绩申诉
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dispute.ts")]
pub struct GradeDispute {
    pub id: String,
    pub grade_id: String,
    pub student_id: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub reason: String,
    pub status: DisputeStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub resolution: Option<String>,
}

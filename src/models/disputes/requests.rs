use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::DisputeStatus;

// 提交申诉
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dispute.ts")]
pub struct SubmitDisputeRequest {
    pub grade_id: String,
    pub student_id: String,
    pub reason: String,
}

// 申诉列表筛选
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dispute.ts")]
pub struct DisputeListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DisputeStatus>,
}

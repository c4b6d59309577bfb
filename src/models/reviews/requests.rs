use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::ReviewDecision;

// 申请复核
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct GradeReviewRequest {
    pub grade_id: String,
    pub reason: String,
    pub requested_by: String,
}

// 复核结论
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct ReviewDecisionRequest {
    pub decision: ReviewDecision,
    pub reviewed_by: String,
}

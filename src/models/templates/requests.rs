use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::requests::GradeCreateData;

// 创建评分模板
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/template.ts")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub course_id: String,
    pub template: GradeCreateData,
}


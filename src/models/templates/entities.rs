use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::grades::requests::{GradeCreateData, GradeUpdateData};

// 评分模板：可复用的预填评分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/template.ts")]
pub struct GradeTemplate {
    pub id: String,
    pub name: String,
    pub course_id: String,
    pub template: GradeCreateData,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl GradeTemplate {
    /// 生成应用到某个评分上的更新补丁
    pub fn patch_for(&self, grade_id: &str) -> GradeUpdateData {
        let t = &self.template;
        GradeUpdateData {
            id: grade_id.to_string(),
            score: Some(t.score),
            max_score: Some(t.max_score),
            feedback: Some(t.feedback.clone()),
            rubric_id: t.rubric_id.clone(),
            rubric_grades: Some(t.rubric_grades.clone()),
            reason: Some(format!("template {} applied", self.name)),
        }
    }
}

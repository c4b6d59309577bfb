use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 比较分值时允许的浮点误差
pub const SCORE_EPSILON: f64 = 1e-6;

// 评分状态（仅用于列表筛选）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum GradeStatus {
    Pending,  // 有待处理的复核申请
    Graded,   // 已评分，无待处理复核
    Reviewed, // 至少有一次复核已经有结论
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Pending => write!(f, "pending"),
            GradeStatus::Graded => write!(f, "graded"),
            GradeStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

// 单个评分项的得分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct RubricGrade {
    pub criterion_id: String,
    pub level_id: String,
    pub points_awarded: f64,
    #[serde(default)]
    pub feedback: String,
}

// 评分实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Grade {
    pub id: String,
    pub submission_id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub graded_by: String,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub rubric_id: Option<String>,
    #[serde(default)]
    pub rubric_grades: Vec<RubricGrade>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Grade {
    /// 百分制得分（四舍五入到整数）
    pub fn percentage(&self) -> f64 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        (self.score / self.max_score * 100.0).round()
    }

    /// 评分明细得分之和
    pub fn rubric_points(&self) -> f64 {
        self.rubric_grades.iter().map(|r| r.points_awarded).sum()
    }
}

// 分数变更历史（只追加）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeHistory {
    pub id: String,
    pub grade_id: String,
    pub changed_by: String,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub old_value: f64,
    pub new_value: f64,
    pub reason: String,
}

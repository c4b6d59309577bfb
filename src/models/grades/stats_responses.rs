use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Grade;

/// 批改进度
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingProgress {
    pub total_submissions: u64,
    pub graded_submissions: u64,
    pub pending_submissions: u64,
    pub percentage: f64,
}

/// 评分统计（按需计算，不持久化）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeStatistics {
    pub total_grades: u64,
    pub average_score: f64,
    pub median_score: f64,
    pub standard_deviation: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// 等级区间 -> 数量，只包含出现过的区间
    pub grade_distribution: BTreeMap<String, u64>,
    pub grading_progress: GradingProgress,
}

/// 成绩趋势分类结果
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeTrends {
    pub improving: Vec<Grade>,
    pub declining: Vec<Grade>,
    pub stable: Vec<Grade>,
}

/// 某天的平均分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AverageScorePoint {
    pub date: chrono::NaiveDate,
    pub score: f64,
}

/// 某天批改的数量
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingSpeedPoint {
    pub date: chrono::NaiveDate,
    pub submissions: u64,
}

/// 按天的趋势序列
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct AnalyticsTrends {
    pub average_scores: Vec<AverageScorePoint>,
    pub grading_speed: Vec<GradingSpeedPoint>,
}

/// 课程成绩分析
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeAnalytics {
    pub overall_stats: GradeStatistics,
    pub per_assignment: BTreeMap<String, GradeStatistics>,
    pub per_student: BTreeMap<String, GradeStatistics>,
    pub trends: AnalyticsTrends,
}

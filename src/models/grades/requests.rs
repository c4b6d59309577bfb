use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Grade, GradeStatus, RubricGrade};

// 创建评分请求
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeCreateData {
    pub submission_id: String,
    #[serde(default)]
    pub assignment_id: String,
    #[serde(default)]
    pub student_id: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub rubric_id: Option<String>,
    #[serde(default)]
    pub rubric_grades: Vec<RubricGrade>,
}

// 更新评分请求（未提供的字段保持不变）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeUpdateData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_grades: Option<Vec<RubricGrade>>,
    /// 写入分数历史的变更原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GradeUpdateData {
    /// 把补丁应用到已有评分上，返回合并后的记录（不做校验）
    pub fn apply_to(&self, existing: &Grade) -> Grade {
        let mut merged = existing.clone();
        if let Some(score) = self.score {
            merged.score = score;
        }
        if let Some(max_score) = self.max_score {
            merged.max_score = max_score;
        }
        if let Some(feedback) = &self.feedback {
            merged.feedback = feedback.clone();
        }
        if let Some(rubric_id) = &self.rubric_id {
            merged.rubric_id = Some(rubric_id.clone());
        }
        if let Some(rubric_grades) = &self.rubric_grades {
            merged.rubric_grades = rubric_grades.clone();
        }
        merged
    }
}

// 评分列表筛选条件
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GradeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_max: Option<f64>,
}

impl GradeFilter {
    pub fn for_assignment(assignment_id: impl Into<String>) -> Self {
        Self {
            assignment_id: Some(assignment_id.into()),
            ..Default::default()
        }
    }

    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            ..Default::default()
        }
    }

    /// 检查评分是否满足除 status 以外的所有条件
    ///
    /// status 依赖复核记录，由存储层单独判断。
    pub fn matches(&self, grade: &Grade) -> bool {
        if let Some(assignment_id) = &self.assignment_id
            && &grade.assignment_id != assignment_id
        {
            return false;
        }
        if let Some(student_id) = &self.student_id
            && &grade.student_id != student_id
        {
            return false;
        }
        if let Some(graded_by) = &self.graded_by
            && &grade.graded_by != graded_by
        {
            return false;
        }
        if let Some(from) = self.date_from
            && grade.graded_at < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && grade.graded_at > to
        {
            return false;
        }
        if let Some(min) = self.score_min
            && grade.score < min
        {
            return false;
        }
        if let Some(max) = self.score_max
            && grade.score > max
        {
            return false;
        }
        true
    }

    /// 转换为查询参数（HTTP 存储使用）
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.assignment_id {
            pairs.push(("assignmentId", v.clone()));
        }
        if let Some(v) = &self.student_id {
            pairs.push(("studentId", v.clone()));
        }
        if let Some(v) = &self.graded_by {
            pairs.push(("gradedBy", v.clone()));
        }
        if let Some(v) = self.status {
            pairs.push(("status", v.to_string()));
        }
        if let Some(v) = self.date_from {
            pairs.push(("dateFrom", v.to_rfc3339()));
        }
        if let Some(v) = self.date_to {
            pairs.push(("dateTo", v.to_rfc3339()));
        }
        if let Some(v) = self.score_min {
            pairs.push(("scoreMin", v.to_string()));
        }
        if let Some(v) = self.score_max {
            pairs.push(("scoreMax", v.to_string()));
        }
        pairs
    }
}

// 批量更新请求
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeBulkUpdate {
    pub grade_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_grades: Option<Vec<RubricGrade>>,
}

impl GradeBulkUpdate {
    /// 针对单个评分生成更新补丁
    pub fn patch_for(&self, grade_id: &str) -> GradeUpdateData {
        GradeUpdateData {
            id: grade_id.to_string(),
            score: self.score,
            feedback: self.feedback.clone(),
            rubric_grades: self.rubric_grades.clone(),
            reason: Some("bulk update".to_string()),
            ..Default::default()
        }
    }
}

// 导出格式
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Pdf,
}

// 日期区间
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct DateRange {
    pub from: chrono::DateTime<chrono::Utc>,
    pub to: chrono::DateTime<chrono::Utc>,
}

impl DateRange {
    pub fn contains(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        at >= self.from && at <= self.to
    }
}

// 导出请求
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeExportRequest {
    pub format: ExportFormat,
    pub include_feedback: bool,
    pub include_rubric_details: bool,
    pub include_student_info: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

// 导入字段映射：键为评分字段，值为源数据中的列名
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct FieldMapping {
    pub student_id: String,
    pub score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
}

// 导入请求（源文件已由调用方解析为行）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeImportRequest {
    pub source_records: Vec<HashMap<String, String>>,
    pub assignment_id: String,
    pub max_score: f64,
    pub field_mapping: FieldMapping,
    #[serde(default)]
    pub update_existing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grade(score: f64) -> Grade {
        let at = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        Grade {
            id: "g1".to_string(),
            submission_id: "s1".to_string(),
            assignment_id: "a1".to_string(),
            student_id: "u1".to_string(),
            graded_by: "t1".to_string(),
            graded_at: at,
            score,
            max_score: 100.0,
            feedback: String::new(),
            rubric_id: None,
            rubric_grades: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_filter_matches() {
        let g = grade(72.0);
        assert!(GradeFilter::default().matches(&g));
        assert!(GradeFilter::for_assignment("a1").matches(&g));
        assert!(!GradeFilter::for_assignment("a2").matches(&g));
        assert!(!GradeFilter::for_student("u2").matches(&g));

        let range = GradeFilter {
            score_min: Some(70.0),
            score_max: Some(80.0),
            ..Default::default()
        };
        assert!(range.matches(&g));
        assert!(!range.matches(&grade(81.0)));
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = GradeFilter {
            assignment_id: Some("a1".to_string()),
            status: Some(GradeStatus::Reviewed),
            score_min: Some(60.0),
            ..Default::default()
        };
        let pairs = filter.to_query_pairs();
        assert!(pairs.contains(&("assignmentId", "a1".to_string())));
        assert!(pairs.contains(&("status", "reviewed".to_string())));
        assert!(pairs.contains(&("scoreMin", "60".to_string())));
    }

    #[test]
    fn test_update_apply_keeps_unset_fields() {
        let g = grade(50.0);
        let patch = GradeUpdateData {
            id: g.id.clone(),
            feedback: Some("better".to_string()),
            ..Default::default()
        };
        let merged = patch.apply_to(&g);
        assert_eq!(merged.score, 50.0);
        assert_eq!(merged.feedback, "better");
        assert_eq!(merged.max_score, 100.0);
    }
}

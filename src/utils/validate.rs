use crate::errors::{GradingError, Result};
use crate::models::grades::entities::{Grade, RubricGrade, SCORE_EPSILON};
use crate::models::grades::requests::GradeCreateData;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 校验分数与评分明细，返回全部错误
///
/// 规则：
/// - 分数必须是非负有限数
/// - 满分必须大于 0 且不小于分数
/// - 设置了量规时，评分明细之和必须等于分数
pub fn grade_shape_errors(
    score: f64,
    max_score: f64,
    rubric_id: Option<&str>,
    rubric_grades: &[RubricGrade],
) -> Vec<String> {
    let mut errors = Vec::new();

    if !score.is_finite() {
        errors.push("Score must be a finite number".to_string());
    } else if score < 0.0 {
        errors.push("Score cannot be negative".to_string());
    }

    if !max_score.is_finite() || max_score <= 0.0 {
        errors.push("Max score must be greater than 0".to_string());
    } else if score.is_finite() && score > max_score + SCORE_EPSILON {
        errors.push(format!("Score {score} exceeds max score {max_score}"));
    }

    for entry in rubric_grades {
        if !entry.points_awarded.is_finite() || entry.points_awarded < 0.0 {
            errors.push(format!(
                "Rubric points for criterion {} must be a non-negative number",
                entry.criterion_id
            ));
        }
    }

    // 明细为空时总分按 0 计
    if rubric_id.is_some() {
        let total: f64 = rubric_grades.iter().map(|r| r.points_awarded).sum();
        if (total - score).abs() > SCORE_EPSILON {
            errors.push(format!(
                "Rubric points total {} does not match score {score}",
                round2(total)
            ));
        }
    }

    errors
}

/// 校验创建数据，返回全部错误
pub fn create_data_errors(data: &GradeCreateData) -> Vec<String> {
    let mut errors = Vec::new();
    if data.submission_id.trim().is_empty() {
        errors.push("Submission ID is required".to_string());
    }
    errors.extend(grade_shape_errors(
        data.score,
        data.max_score,
        data.rubric_id.as_deref(),
        &data.rubric_grades,
    ));
    errors
}

/// 创建数据的非致命提示
pub fn create_data_warnings(data: &GradeCreateData) -> Vec<String> {
    let mut warnings = Vec::new();
    if data.score == 0.0 {
        warnings.push("Score is zero".to_string());
    }
    if data.feedback.trim().is_empty() {
        warnings.push("Feedback is empty".to_string());
    }
    if data.rubric_id.is_some() && data.rubric_grades.is_empty() {
        warnings.push("Rubric is set but no rubric grades were given".to_string());
    }
    warnings
}

fn into_result(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GradingError::validation(errors.join("; ")))
    }
}

pub fn validate_create_data(data: &GradeCreateData) -> Result<()> {
    into_result(create_data_errors(data))
}

/// 校验合并后的评分记录
pub fn validate_grade(grade: &Grade) -> Result<()> {
    into_result(grade_shape_errors(
        grade.score,
        grade.max_score,
        grade.rubric_id.as_deref(),
        &grade.rubric_grades,
    ))
}

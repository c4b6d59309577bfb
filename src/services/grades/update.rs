use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::GradeService;
use crate::errors::{GradingError, Result};
use crate::models::grades::{
    entities::{Grade, GradeHistory, SCORE_EPSILON},
    requests::GradeUpdateData,
};
use crate::models::notifications::entities::NotificationType;
use crate::services::events::GradeEvent;
use crate::utils::validate::validate_grade;

pub async fn update_grade(
    service: &GradeService,
    data: GradeUpdateData,
    changed_by: &str,
) -> Result<Grade> {
    let existing = service
        .storage()
        .get_grade(&data.id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("评分不存在: {}", data.id)))?;

    let mut merged = data.apply_to(&existing);
    validate_grade(&merged)?;

    let now = Utc::now();
    merged.updated_at = now;

    // 分数变化时先写历史，再持久化新值
    let history = if (merged.score - existing.score).abs() > SCORE_EPSILON {
        let entry = GradeHistory {
            id: Uuid::new_v4().to_string(),
            grade_id: existing.id.clone(),
            changed_by: changed_by.to_string(),
            changed_at: now,
            old_value: existing.score,
            new_value: merged.score,
            reason: data
                .reason
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "score updated".to_string()),
        };
        Some(service.storage().append_history(entry).await?)
    } else {
        None
    };

    let grade = service
        .storage()
        .update_grade(merged)
        .await
        .map_err(|e| {
            error!("更新评分失败: {}", e);
            e
        })?
        .ok_or_else(|| GradingError::not_found(format!("评分不存在: {}", data.id)))?;

    service.remember(&grade);
    info!("Grade {} updated by {}", grade.id, changed_by);
    if let Some(entry) = &history {
        service
            .notify(
                &grade.student_id,
                NotificationType::GradeUpdated,
                &grade.id,
                format!(
                    "Score for assignment {} changed from {} to {}",
                    grade.assignment_id, entry.old_value, entry.new_value
                ),
            )
            .await;
    }
    service
        .after_mutation(
            &grade.assignment_id,
            GradeEvent::Updated {
                grade: grade.clone(),
                history,
            },
        )
        .await;

    Ok(grade)
}

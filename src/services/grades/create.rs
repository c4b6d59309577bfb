use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::GradeService;
use crate::errors::Result;
use crate::models::grades::{entities::Grade, requests::GradeCreateData};
use crate::models::notifications::entities::NotificationType;
use crate::services::events::GradeEvent;
use crate::utils::validate::validate_create_data;

pub async fn create_grade(
    service: &GradeService,
    data: GradeCreateData,
    graded_by: &str,
) -> Result<Grade> {
    validate_create_data(&data)?;

    let now = Utc::now();
    let grade = Grade {
        id: Uuid::new_v4().to_string(),
        submission_id: data.submission_id,
        assignment_id: data.assignment_id,
        student_id: data.student_id,
        graded_by: graded_by.to_string(),
        graded_at: now,
        score: data.score,
        max_score: data.max_score,
        feedback: data.feedback,
        rubric_id: data.rubric_id,
        rubric_grades: data.rubric_grades,
        created_at: now,
        updated_at: now,
    };

    let grade = service.storage().create_grade(grade).await.map_err(|e| {
        error!("创建评分失败: {}", e);
        e
    })?;

    service.remember(&grade);
    info!(
        "Grade {} created for submission {} ({}/{})",
        grade.id, grade.submission_id, grade.score, grade.max_score
    );
    service
        .after_mutation(&grade.assignment_id, GradeEvent::Created(grade.clone()))
        .await;
    service
        .notify(
            &grade.student_id,
            NotificationType::GradeSubmitted,
            &grade.id,
            format!(
                "Assignment {} graded: {}/{}",
                grade.assignment_id, grade.score, grade.max_score
            ),
        )
        .await;

    Ok(grade)
}

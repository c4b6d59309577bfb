use tracing::info;

use super::GradeService;
use crate::errors::{GradingError, Result};
use crate::services::events::GradeEvent;

pub async fn delete_grade(service: &GradeService, id: &str) -> Result<()> {
    // 需要作业 ID 来失效统计缓存
    let existing = service
        .storage()
        .get_grade(id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("评分不存在: {id}")))?;

    if !service.storage().delete_grade(id).await? {
        service.forget(id);
        return Err(GradingError::not_found(format!("评分不存在: {id}")));
    }

    service.forget(id);
    info!("Grade {} deleted", id);
    service
        .after_mutation(
            &existing.assignment_id,
            GradeEvent::Deleted {
                id: id.to_string(),
                assignment_id: existing.assignment_id.clone(),
            },
        )
        .await;

    Ok(())
}

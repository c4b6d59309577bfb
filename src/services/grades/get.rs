use tracing::debug;

use super::GradeService;
use crate::errors::{GradingError, Result};
use crate::models::grades::entities::Grade;

pub async fn get_grade(service: &GradeService, id: &str) -> Result<Grade> {
    if let Some(grade) = service.cached(id) {
        debug!("Grade {} served from working set", id);
        return Ok(grade);
    }

    let grade = service
        .storage()
        .get_grade(id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("评分不存在: {id}")))?;
    service.remember(&grade);
    Ok(grade)
}

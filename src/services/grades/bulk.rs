use tracing::{info, warn};

use super::GradeService;
use crate::errors::{GradingError, Result};
use crate::models::grades::{
    requests::GradeBulkUpdate,
    responses::{BatchFailure, BulkUpdateResult},
};

/// 对每个评分独立应用同一补丁，单条失败不影响其余记录
pub async fn bulk_update(
    service: &GradeService,
    bulk: &GradeBulkUpdate,
    changed_by: &str,
) -> Result<BulkUpdateResult> {
    let limit = service.config().max_batch_size;
    if bulk.grade_ids.len() > limit {
        return Err(GradingError::validation(format!(
            "单次批量更新最多支持 {limit} 条，实际 {}",
            bulk.grade_ids.len()
        )));
    }

    let mut result = BulkUpdateResult::default();
    for id in &bulk.grade_ids {
        match service.update(bulk.patch_for(id), changed_by).await {
            Ok(grade) => result.succeeded.push(grade),
            Err(e) => {
                warn!("Bulk update skipped grade {}: {}", id, e);
                result.failed.push(BatchFailure::from_error(id.clone(), &e));
            }
        }
    }

    info!(
        "Bulk update finished: {} succeeded, {} failed",
        result.succeeded.len(),
        result.failed.len()
    );
    Ok(result)
}

use super::GradeService;
use crate::errors::Result;
use crate::models::grades::entities::GradeHistory;

pub async fn grade_history(service: &GradeService, id: &str) -> Result<Vec<GradeHistory>> {
    // 评分不存在时返回 NotFound
    service.get(id).await?;
    service.storage().list_history(id).await
}

use tracing::{error, info};

use super::GradeService;
use crate::errors::Result;
use crate::models::grades::requests::GradeExportRequest;

pub async fn export_grades(service: &GradeService, request: &GradeExportRequest) -> Result<Vec<u8>> {
    let bytes = service
        .storage()
        .export_grades(request)
        .await
        .map_err(|e| {
            error!("导出评分失败: {}", e);
            e
        })?;
    info!("Exported {} bytes of grades as {:?}", bytes.len(), request.format);
    Ok(bytes)
}

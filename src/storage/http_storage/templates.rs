//! 模板与导出接口

use reqwest::Method;

use super::{HttpStorage, not_found_as_none};
use crate::errors::Result;
use crate::models::{grades::requests::GradeExportRequest, templates::entities::GradeTemplate};

impl HttpStorage {
    pub async fn create_template_impl(&self, template: GradeTemplate) -> Result<GradeTemplate> {
        let builder = self.request(Method::POST, "/grades/templates").json(&template);
        self.send_data(builder).await
    }

    pub async fn get_template_impl(&self, id: &str) -> Result<Option<GradeTemplate>> {
        // `/grades/templates/{courseId}` 已用于按课程列出
        let builder = self.request(Method::GET, &format!("/grades/templates/detail/{id}"));
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn list_templates_impl(&self, course_id: &str) -> Result<Vec<GradeTemplate>> {
        let builder = self.request(Method::GET, &format!("/grades/templates/{course_id}"));
        Ok(self.send(builder).await?.unwrap_or_default())
    }

    /// 导出内容是原始字节，不经过响应信封
    pub async fn export_grades_impl(&self, request: &GradeExportRequest) -> Result<Vec<u8>> {
        let builder = self.request(Method::POST, "/grades/export").json(request);
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

//! 评分模板存储操作

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::templates::entities::GradeTemplate;

impl MemoryStorage {
    pub async fn create_template_impl(&self, template: GradeTemplate) -> Result<GradeTemplate> {
        if self.templates.contains_key(&template.id) {
            return Err(GradingError::conflict(format!(
                "评分模板已存在: {}",
                template.id
            )));
        }
        self.templates.insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub async fn get_template_impl(&self, id: &str) -> Result<Option<GradeTemplate>> {
        Ok(self.templates.get(id).map(|t| t.value().clone()))
    }

    /// 列出课程的模板（按名称排序）
    pub async fn list_templates_impl(&self, course_id: &str) -> Result<Vec<GradeTemplate>> {
        let mut templates: Vec<GradeTemplate> = self
            .templates
            .iter()
            .filter(|t| t.course_id == course_id)
            .map(|t| t.value().clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }
}

//! 评分模板
//!
//! 模板是一份预填的评分数据，应用时逐个评分走常规更新流程。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{GradingError, Result};
use crate::models::{
    grades::responses::{BatchFailure, BulkUpdateResult},
    templates::{entities::GradeTemplate, requests::CreateTemplateRequest},
};
use crate::services::grades::GradeService;
use crate::utils::validate::grade_shape_errors;

pub struct TemplateService {
    grades: Arc<GradeService>,
}

impl TemplateService {
    pub fn new(grades: Arc<GradeService>) -> Self {
        Self { grades }
    }

    /// 创建模板，只校验分数结构（模板不绑定具体提交）
    pub async fn create_template(&self, request: CreateTemplateRequest) -> Result<GradeTemplate> {
        if request.name.trim().is_empty() {
            return Err(GradingError::validation("模板名称不能为空"));
        }
        if request.course_id.trim().is_empty() {
            return Err(GradingError::validation("模板需要指定课程"));
        }
        let t = &request.template;
        let errors = grade_shape_errors(t.score, t.max_score, t.rubric_id.as_deref(), &t.rubric_grades);
        if !errors.is_empty() {
            return Err(GradingError::validation(errors.join("; ")));
        }

        let now = Utc::now();
        let template = GradeTemplate {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            course_id: request.course_id,
            template: request.template,
            created_at: now,
            updated_at: now,
        };
        let template = self.grades.storage().create_template(template).await?;
        info!("Grade template {} created for course {}", template.name, template.course_id);
        Ok(template)
    }

    pub async fn list_templates(&self, course_id: &str) -> Result<Vec<GradeTemplate>> {
        self.grades.storage().list_templates(course_id).await
    }

    /// 把模板应用到多个评分，单条失败互不影响
    pub async fn apply(
        &self,
        template_id: &str,
        grade_ids: &[String],
        changed_by: &str,
    ) -> Result<BulkUpdateResult> {
        let template = self
            .grades
            .storage()
            .get_template(template_id)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("评分模板不存在: {template_id}")))?;

        let limit = self.grades.config().max_batch_size;
        if grade_ids.len() > limit {
            return Err(GradingError::validation(format!(
                "单次最多应用到 {limit} 个评分"
            )));
        }

        let mut result = BulkUpdateResult::default();
        for id in grade_ids {
            match self.grades.update(template.patch_for(id), changed_by).await {
                Ok(grade) => result.succeeded.push(grade),
                Err(e) => {
                    warn!("Template {} not applied to grade {}: {}", template.name, id, e);
                    result.failed.push(BatchFailure::from_error(id.clone(), &e));
                }
            }
        }
        info!(
            "Template {} applied: {} succeeded, {} failed",
            template.name,
            result.succeeded.len(),
            result.failed.len()
        );
        Ok(result)
    }
}

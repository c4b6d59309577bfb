//! 成绩申诉流程
//!
//! 状态：pending → under_review → resolved，或 pending → resolved。

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{GradingError, Result};
use crate::models::disputes::{
    entities::{DisputeStatus, GradeDispute},
    requests::{DisputeListQuery, SubmitDisputeRequest},
};
use crate::models::notifications::entities::NotificationType;
use crate::services::events::{EventBus, GradeEvent};
use crate::services::grades::GradeService;

pub struct DisputeService {
    grades: Arc<GradeService>,
    events: Arc<EventBus>,
    // 串行化状态检查与写入
    transition_lock: Mutex<()>,
}

impl DisputeService {
    pub fn new(grades: Arc<GradeService>, events: Arc<EventBus>) -> Self {
        Self {
            grades,
            events,
            transition_lock: Mutex::new(()),
        }
    }

    /// 提交申诉，同一评分允许多个未结申诉
    pub async fn submit(&self, request: &SubmitDisputeRequest) -> Result<GradeDispute> {
        if request.reason.trim().is_empty() {
            return Err(GradingError::validation("申诉原因不能为空"));
        }
        let grade = self.grades.get(&request.grade_id).await?;

        let dispute = GradeDispute {
            id: Uuid::new_v4().to_string(),
            grade_id: request.grade_id.clone(),
            student_id: request.student_id.clone(),
            submitted_at: Utc::now(),
            reason: request.reason.trim().to_string(),
            status: DisputeStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            resolution: None,
        };
        let dispute = self.grades.storage().create_dispute(dispute).await?;

        info!("Dispute {} submitted for grade {}", dispute.id, dispute.grade_id);
        self.grades
            .notify(
                &grade.graded_by,
                NotificationType::DisputeSubmitted,
                &grade.id,
                format!("Dispute submitted by {}: {}", dispute.student_id, dispute.reason),
            )
            .await;
        self.events
            .publish(&GradeEvent::DisputeSubmitted(dispute.clone()));
        Ok(dispute)
    }

    /// 开始处理：只能从 pending 进入 under_review
    pub async fn start_review(&self, dispute_id: &str, reviewed_by: &str) -> Result<GradeDispute> {
        let _guard = self.transition_lock.lock().await;

        let mut dispute = self.get(dispute_id).await?;
        if dispute.status != DisputeStatus::Pending {
            warn!(
                "Rejected review start on dispute {}: status {}",
                dispute_id, dispute.status
            );
            return Err(GradingError::invalid_state(format!(
                "申诉 {dispute_id} 当前状态为 {}，无法开始处理",
                dispute.status
            )));
        }

        dispute.status = DisputeStatus::UnderReview;
        dispute.reviewed_by = Some(reviewed_by.to_string());
        let dispute = self.save(dispute).await?;
        drop(_guard);

        self.events
            .publish(&GradeEvent::DisputeReviewStarted(dispute.clone()));
        Ok(dispute)
    }

    /// 结案
    pub async fn resolve(
        &self,
        dispute_id: &str,
        resolution: &str,
        reviewed_by: &str,
    ) -> Result<GradeDispute> {
        let _guard = self.transition_lock.lock().await;

        let mut dispute = self.get(dispute_id).await?;
        if !dispute.status.is_open() {
            warn!("Rejected resolve on dispute {}: already resolved", dispute_id);
            return Err(GradingError::invalid_state(format!(
                "申诉 {dispute_id} 已解决"
            )));
        }

        dispute.status = DisputeStatus::Resolved;
        dispute.resolution = Some(resolution.to_string());
        dispute.reviewed_by = Some(reviewed_by.to_string());
        dispute.reviewed_at = Some(Utc::now());

        let dispute = self.save(dispute).await?;
        drop(_guard);

        self.events
            .publish(&GradeEvent::DisputeResolved(dispute.clone()));
        Ok(dispute)
    }

    async fn save(&self, dispute: GradeDispute) -> Result<GradeDispute> {
        let id = dispute.id.clone();
        let dispute = self
            .grades
            .storage()
            .update_dispute(dispute)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("申诉不存在: {id}")))?;
        info!("Dispute {} is now {}", dispute.id, dispute.status);
        Ok(dispute)
    }

    pub async fn list(&self, query: &DisputeListQuery) -> Result<Vec<GradeDispute>> {
        let disputes = self
            .grades
            .storage()
            .list_disputes(query.grade_id.as_deref())
            .await?;
        Ok(match query.status {
            Some(status) => disputes.into_iter().filter(|d| d.status == status).collect(),
            None => disputes,
        })
    }

    pub async fn get(&self, dispute_id: &str) -> Result<GradeDispute> {
        self.grades
            .storage()
            .get_dispute(dispute_id)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("申诉不存在: {dispute_id}")))
    }
}

//! 评分复核流程
//!
//! 状态：pending → approved | rejected，两个结论都是终态。

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{GradingError, Result};
use crate::models::notifications::entities::NotificationType;
use crate::models::reviews::{
    entities::{GradeReview, ReviewDecision, ReviewStatus},
    requests::{GradeReviewRequest, ReviewDecisionRequest},
};
use crate::services::events::{EventBus, GradeEvent};
use crate::services::grades::GradeService;

pub struct ReviewService {
    grades: Arc<GradeService>,
    events: Arc<EventBus>,
    // 串行化“检查是否已有待处理复核 + 创建”
    request_lock: Mutex<()>,
}

impl ReviewService {
    pub fn new(grades: Arc<GradeService>, events: Arc<EventBus>) -> Self {
        Self {
            grades,
            events,
            request_lock: Mutex::new(()),
        }
    }

    /// 发起复核申请
    pub async fn request_review(&self, request: &GradeReviewRequest) -> Result<GradeReview> {
        if request.reason.trim().is_empty() {
            return Err(GradingError::validation("复核原因不能为空"));
        }
        // 评分必须存在
        let grade = self.grades.get(&request.grade_id).await?;

        let _guard = self.request_lock.lock().await;

        if let Some(pending) = self.pending_for(&request.grade_id).await? {
            warn!(
                "Rejected review request for grade {}: review {} is still pending",
                request.grade_id, pending.id
            );
            return Err(GradingError::conflict(format!(
                "评分 {} 已有待处理的复核申请",
                request.grade_id
            )));
        }

        let review = GradeReview {
            id: Uuid::new_v4().to_string(),
            grade_id: request.grade_id.clone(),
            requested_by: request.requested_by.clone(),
            requested_at: Utc::now(),
            reason: request.reason.trim().to_string(),
            status: ReviewStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            decision: None,
        };
        let review = self.grades.storage().create_review(review).await?;
        drop(_guard);

        info!("Review {} requested for grade {}", review.id, review.grade_id);
        self.grades
            .notify(
                &grade.graded_by,
                NotificationType::ReviewRequested,
                &grade.id,
                format!("Review requested by {}: {}", review.requested_by, review.reason),
            )
            .await;
        self.events
            .publish(&GradeEvent::ReviewRequested(review.clone()));
        Ok(review)
    }

    /// 给出复核结论
    pub async fn decide(&self, review_id: &str, request: &ReviewDecisionRequest) -> Result<GradeReview> {
        let _guard = self.request_lock.lock().await;

        let mut review = self.get(review_id).await?;
        if review.status.is_terminal() {
            warn!(
                "Rejected decision on review {}: already {}",
                review_id, review.status
            );
            return Err(GradingError::invalid_state(format!(
                "复核 {review_id} 已处理完毕，当前状态: {}",
                review.status
            )));
        }

        let decision: ReviewDecision = request.decision;
        review.status = decision.into();
        review.decision = Some(decision);
        review.reviewed_by = Some(request.reviewed_by.clone());
        review.reviewed_at = Some(Utc::now());

        let review = self
            .grades
            .storage()
            .update_review(review)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("复核不存在: {review_id}")))?;
        drop(_guard);

        info!("Review {} {}", review.id, review.status);
        self.events.publish(&GradeEvent::ReviewDecided(review.clone()));
        Ok(review)
    }

    /// 列出复核申请
    pub async fn list(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>> {
        self.grades.storage().list_reviews(grade_id).await
    }

    pub async fn get(&self, review_id: &str) -> Result<GradeReview> {
        self.grades
            .storage()
            .get_review(review_id)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("复核不存在: {review_id}")))
    }

    /// 评分当前待处理的复核（至多一个）
    pub async fn pending_for(&self, grade_id: &str) -> Result<Option<GradeReview>> {
        Ok(self
            .list(Some(grade_id))
            .await?
            .into_iter()
            .find(|r| r.status == ReviewStatus::Pending))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::grades::test_support::{create_data, service};

    async fn setup() -> (ReviewService, String) {
        let grades = Arc::new(service());
        let grade = grades.create(create_data("s1", "u1", 70.0), "t1").await.unwrap();
        (ReviewService::new(grades, Arc::new(EventBus::new())), grade.id)
    }

    fn request(grade_id: &str, reason: &str) -> GradeReviewRequest {
        GradeReviewRequest {
            grade_id: grade_id.to_string(),
            reason: reason.to_string(),
            requested_by: "u1".to_string(),
        }
    }

    fn decision(decision: ReviewDecision) -> ReviewDecisionRequest {
        ReviewDecisionRequest {
            decision,
            reviewed_by: "prof".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_pending_conflicts() {
        let (reviews, grade_id) = setup().await;
        let first = reviews.request_review(&request(&grade_id, "recheck q2")).await.unwrap();
        assert_eq!(first.status, ReviewStatus::Pending);

        let err = reviews
            .request_review(&request(&grade_id, "again"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(reviews.list(Some(&grade_id)).await.unwrap().len(), 1);

        // 结论给出后可以再次申请
        reviews
            .decide(&first.id, &decision(ReviewDecision::Rejected))
            .await
            .unwrap();
        assert!(reviews.request_review(&request(&grade_id, "third")).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_decision_is_invalid_state() {
        let (reviews, grade_id) = setup().await;
        let review = reviews.request_review(&request(&grade_id, "recheck")).await.unwrap();

        let approved = reviews
            .decide(&review.id, &decision(ReviewDecision::Approved))
            .await
            .unwrap();
        assert_eq!(approved.status, ReviewStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("prof"));
        assert!(approved.reviewed_at.is_some());

        let err = reviews
            .decide(&review.id, &decision(ReviewDecision::Rejected))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(reviews.get(&review.id).await.unwrap(), approved);
    }

    #[tokio::test]
    async fn test_request_validation() {
        let (reviews, grade_id) = setup().await;
        let err = reviews.request_review(&request(&grade_id, "  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = reviews.request_review(&request("ghost", "why")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = reviews
            .decide("ghost", &decision(ReviewDecision::Approved))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(reviews.pending_for(&grade_id).await.unwrap().is_none());
    }
}

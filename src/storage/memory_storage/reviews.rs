//! 复核存储操作

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::reviews::entities::GradeReview;

impl MemoryStorage {
    pub async fn create_review_impl(&self, review: GradeReview) -> Result<GradeReview> {
        if self.reviews.contains_key(&review.id) {
            return Err(GradingError::conflict(format!(
                "复核申请已存在: {}",
                review.id
            )));
        }
        self.reviews.insert(review.id.clone(), review.clone());
        Ok(review)
    }

    pub async fn get_review_impl(&self, id: &str) -> Result<Option<GradeReview>> {
        Ok(self.reviews.get(id).map(|r| r.value().clone()))
    }

    pub async fn update_review_impl(&self, review: GradeReview) -> Result<Option<GradeReview>> {
        match self.reviews.get_mut(&review.id) {
            Some(mut entry) => {
                *entry = review.clone();
                Ok(Some(review))
            }
            None => Ok(None),
        }
    }

    /// 列出复核申请（按申请时间正序）
    pub async fn list_reviews_impl(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>> {
        let mut reviews: Vec<GradeReview> = self
            .reviews
            .iter()
            .filter(|r| grade_id.is_none_or(|id| r.grade_id == id))
            .map(|r| r.value().clone())
            .collect();
        reviews.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(reviews)
    }
}

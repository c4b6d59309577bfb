//! 申诉存储操作

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::disputes::entities::GradeDispute;

impl MemoryStorage {
    pub async fn create_dispute_impl(&self, dispute: GradeDispute) -> Result<GradeDispute> {
        if self.disputes.contains_key(&dispute.id) {
            return Err(GradingError::conflict(format!(
                "申诉已存在: {}",
                dispute.id
            )));
        }
        self.disputes.insert(dispute.id.clone(), dispute.clone());
        Ok(dispute)
    }

    pub async fn get_dispute_impl(&self, id: &str) -> Result<Option<GradeDispute>> {
        Ok(self.disputes.get(id).map(|d| d.value().clone()))
    }

    pub async fn update_dispute_impl(&self, dispute: GradeDispute) -> Result<Option<GradeDispute>> {
        match self.disputes.get_mut(&dispute.id) {
            Some(mut entry) => {
                *entry = dispute.clone();
                Ok(Some(dispute))
            }
            None => Ok(None),
        }
    }

    pub async fn list_disputes_impl(&self, grade_id: Option<&str>) -> Result<Vec<GradeDispute>> {
        let mut disputes: Vec<GradeDispute> = self
            .disputes
            .iter()
            .filter(|d| grade_id.is_none_or(|id| d.grade_id == id))
            .map(|d| d.value().clone())
            .collect();
        disputes.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(disputes)
    }
}

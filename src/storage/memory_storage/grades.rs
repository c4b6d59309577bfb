//! 评分存储操作

use super::MemoryStorage;
use crate::errors::{GradingError, Result};
use crate::models::{
    grades::{
        entities::{Grade, GradeHistory, GradeStatus},
        requests::GradeFilter,
    },
    reviews::entities::ReviewStatus,
};

impl MemoryStorage {
    /// 根据复核记录推导评分状态是否满足筛选
    fn status_matches(&self, grade_id: &str, status: GradeStatus) -> bool {
        let mut has_pending = false;
        let mut has_decided = false;
        for review in self.reviews.iter().filter(|r| r.grade_id == grade_id) {
            if review.status == ReviewStatus::Pending {
                has_pending = true;
            } else {
                has_decided = true;
            }
        }

        match status {
            GradeStatus::Pending => has_pending,
            GradeStatus::Graded => !has_pending,
            GradeStatus::Reviewed => has_decided,
        }
    }

    /// 列出评分
    pub async fn list_grades_impl(&self, filter: &GradeFilter) -> Result<Vec<Grade>> {
        let mut grades: Vec<Grade> = self
            .grades
            .iter()
            .filter(|g| filter.matches(g.value()))
            .filter(|g| match filter.status {
                Some(status) => self.status_matches(&g.id, status),
                None => true,
            })
            .map(|g| g.value().clone())
            .collect();

        // 按评分时间倒序
        grades.sort_by(|a, b| b.graded_at.cmp(&a.graded_at).then_with(|| a.id.cmp(&b.id)));
        Ok(grades)
    }

    /// 通过 ID 获取评分
    pub async fn get_grade_impl(&self, id: &str) -> Result<Option<Grade>> {
        Ok(self.grades.get(id).map(|g| g.value().clone()))
    }

    /// 创建评分
    pub async fn create_grade_impl(&self, grade: Grade) -> Result<Grade> {
        if self.grades.contains_key(&grade.id) {
            return Err(GradingError::conflict(format!(
                "评分已存在: {}",
                grade.id
            )));
        }
        self.grades.insert(grade.id.clone(), grade.clone());
        Ok(grade)
    }

    /// 覆盖更新评分
    pub async fn update_grade_impl(&self, grade: Grade) -> Result<Option<Grade>> {
        match self.grades.get_mut(&grade.id) {
            Some(mut entry) => {
                *entry = grade.clone();
                Ok(Some(grade))
            }
            None => Ok(None),
        }
    }

    /// 删除评分
    pub async fn delete_grade_impl(&self, id: &str) -> Result<bool> {
        Ok(self.grades.remove(id).is_some())
    }

    /// 追加分数历史
    pub async fn append_history_impl(&self, entry: GradeHistory) -> Result<GradeHistory> {
        self.history
            .entry(entry.grade_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    /// 列出分数历史
    pub async fn list_history_impl(&self, grade_id: &str) -> Result<Vec<GradeHistory>> {
        let mut entries = self
            .history
            .get(grade_id)
            .map(|h| h.value().clone())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.changed_at.cmp(&b.changed_at));
        Ok(entries)
    }
}

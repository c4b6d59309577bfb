//! 评分接口

use reqwest::Method;

use super::{HttpStorage, not_found_as_none};
use crate::errors::Result;
use crate::models::grades::{
    entities::{Grade, GradeHistory},
    requests::GradeFilter,
};

impl HttpStorage {
    pub async fn list_grades_impl(&self, filter: &GradeFilter) -> Result<Vec<Grade>> {
        let builder = self
            .request(Method::GET, "/grades")
            .query(&filter.to_query_pairs());
        Ok(self.send(builder).await?.unwrap_or_default())
    }

    pub async fn get_grade_impl(&self, id: &str) -> Result<Option<Grade>> {
        let builder = self.request(Method::GET, &format!("/grades/{id}"));
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn create_grade_impl(&self, grade: Grade) -> Result<Grade> {
        let builder = self.request(Method::POST, "/grades").json(&grade);
        self.send_data(builder).await
    }

    pub async fn update_grade_impl(&self, grade: Grade) -> Result<Option<Grade>> {
        let builder = self
            .request(Method::PUT, &format!("/grades/{}", grade.id))
            .json(&grade);
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn delete_grade_impl(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &format!("/grades/{id}"));
        let deleted = not_found_as_none(self.execute(builder).await)?;
        Ok(deleted.is_some())
    }

    pub async fn append_history_impl(&self, entry: GradeHistory) -> Result<GradeHistory> {
        let builder = self
            .request(Method::POST, &format!("/grades/{}/history", entry.grade_id))
            .json(&entry);
        self.send_data(builder).await
    }

    pub async fn list_history_impl(&self, grade_id: &str) -> Result<Vec<GradeHistory>> {
        let builder = self.request(Method::GET, &format!("/grades/{grade_id}/history"));
        Ok(self.send(builder).await?.unwrap_or_default())
    }
}

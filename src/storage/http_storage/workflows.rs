//! 复核与申诉接口

use reqwest::Method;

use super::{HttpStorage, not_found_as_none};
use crate::errors::Result;
use crate::models::{disputes::entities::GradeDispute, reviews::entities::GradeReview};

impl HttpStorage {
    pub async fn create_review_impl(&self, review: GradeReview) -> Result<GradeReview> {
        let builder = self.request(Method::POST, "/grade-reviews").json(&review);
        self.send_data(builder).await
    }

    pub async fn get_review_impl(&self, id: &str) -> Result<Option<GradeReview>> {
        let builder = self.request(Method::GET, &format!("/grade-reviews/{id}"));
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn update_review_impl(&self, review: GradeReview) -> Result<Option<GradeReview>> {
        let builder = self
            .request(Method::PUT, &format!("/grade-reviews/{}", review.id))
            .json(&review);
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn list_reviews_impl(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>> {
        let mut builder = self.request(Method::GET, "/grade-reviews");
        if let Some(grade_id) = grade_id {
            builder = builder.query(&[("gradeId", grade_id)]);
        }
        Ok(self.send(builder).await?.unwrap_or_default())
    }

    pub async fn create_dispute_impl(&self, dispute: GradeDispute) -> Result<GradeDispute> {
        let builder = self.request(Method::POST, "/grade-disputes").json(&dispute);
        self.send_data(builder).await
    }

    pub async fn get_dispute_impl(&self, id: &str) -> Result<Option<GradeDispute>> {
        let builder = self.request(Method::GET, &format!("/grade-disputes/{id}"));
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn update_dispute_impl(&self, dispute: GradeDispute) -> Result<Option<GradeDispute>> {
        let builder = self
            .request(Method::PUT, &format!("/grade-disputes/{}", dispute.id))
            .json(&dispute);
        not_found_as_none(self.send_data(builder).await)
    }

    pub async fn list_disputes_impl(&self, grade_id: Option<&str>) -> Result<Vec<GradeDispute>> {
        let mut builder = self.request(Method::GET, "/grade-disputes");
        if let Some(grade_id) = grade_id {
            builder = builder.query(&[("gradeId", grade_id)]);
        }
        Ok(self.send(builder).await?.unwrap_or_default())
    }
}

//! HTTP 存储实现
//!
//! 通过 REST 接口访问远端评分后端，所有 JSON 响应统一经 `ApiResponse` 解包。

mod grades;
mod notifications;
mod templates;
mod workflows;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use ts_rs::TS;

use crate::config::StorageConfig;
use crate::errors::{ErrorKind, GradingError, Result};
use crate::models::{
    ApiResponse,
    disputes::entities::GradeDispute,
    grades::{
        entities::{Grade, GradeHistory},
        requests::{GradeExportRequest, GradeFilter},
    },
    notifications::entities::GradeNotification,
    reviews::entities::GradeReview,
    templates::entities::GradeTemplate,
};
use crate::storage::Storage;

/// HTTP 存储
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpStorage {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GradingError::storage_connection(format!("无法创建 HTTP 客户端: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let api_token = Some(config.api_token.clone()).filter(|t| !t.is_empty());

        debug!("HTTP storage initialized, backend: {}", base_url);
        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    /// 构造带认证头的请求
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 发送请求并返回成功的原始响应
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            error!("请求存储后端失败: {}", e);
            GradingError::from(e)
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response).await)
        }
    }

    /// 发送请求并解包响应信封
    pub(crate) async fn send<T>(&self, builder: RequestBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned + TS,
    {
        let response = self.execute(builder).await?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result()
    }

    /// 同 `send`，但要求响应带有 data
    pub(crate) async fn send_data<T>(&self, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + TS,
    {
        self.send::<T>(builder)
            .await?
            .ok_or_else(|| GradingError::serialization("响应缺少 data 字段"))
    }
}

/// 把非 2xx 响应映射为对应的错误类型
async fn status_error(response: Response) -> GradingError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    // 优先使用信封里的 message
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        .map(|r| r.message)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => GradingError::not_found(message),
        StatusCode::CONFLICT => GradingError::conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GradingError::validation(message)
        }
        _ => {
            error!("存储后端返回 HTTP {}: {}", status, message);
            GradingError::storage_operation(format!("HTTP {status}: {message}"))
        }
    }
}

/// 404 视为不存在
pub(crate) fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl Storage for HttpStorage {
    // 评分模块
    async fn list_grades(&self, filter: &GradeFilter) -> Result<Vec<Grade>> {
        self.list_grades_impl(filter).await
    }

    async fn get_grade(&self, id: &str) -> Result<Option<Grade>> {
        self.get_grade_impl(id).await
    }

    async fn create_grade(&self, grade: Grade) -> Result<Grade> {
        self.create_grade_impl(grade).await
    }

    async fn update_grade(&self, grade: Grade) -> Result<Option<Grade>> {
        self.update_grade_impl(grade).await
    }

    async fn delete_grade(&self, id: &str) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    async fn append_history(&self, entry: GradeHistory) -> Result<GradeHistory> {
        self.append_history_impl(entry).await
    }

    async fn list_history(&self, grade_id: &str) -> Result<Vec<GradeHistory>> {
        self.list_history_impl(grade_id).await
    }

    // 复核模块
    async fn create_review(&self, review: GradeReview) -> Result<GradeReview> {
        self.create_review_impl(review).await
    }

    async fn get_review(&self, id: &str) -> Result<Option<GradeReview>> {
        self.get_review_impl(id).await
    }

    async fn update_review(&self, review: GradeReview) -> Result<Option<GradeReview>> {
        self.update_review_impl(review).await
    }

    async fn list_reviews(&self, grade_id: Option<&str>) -> Result<Vec<GradeReview>> {
        self.list_reviews_impl(grade_id).await
    }

    // 申诉模块
    async fn create_dispute(&self, dispute: GradeDispute) -> Result<GradeDispute> {
        self.create_dispute_impl(dispute).await
    }

    async fn get_dispute(&self, id: &str) -> Result<Option<GradeDispute>> {
        self.get_dispute_impl(id).await
    }

    async fn update_dispute(&self, dispute: GradeDispute) -> Result<Option<GradeDispute>> {
        self.update_dispute_impl(dispute).await
    }

    async fn list_disputes(&self, grade_id: Option<&str>) -> Result<Vec<GradeDispute>> {
        self.list_disputes_impl(grade_id).await
    }

    // 模板模块
    async fn create_template(&self, template: GradeTemplate) -> Result<GradeTemplate> {
        self.create_template_impl(template).await
    }

    async fn get_template(&self, id: &str) -> Result<Option<GradeTemplate>> {
        self.get_template_impl(id).await
    }

    async fn list_templates(&self, course_id: &str) -> Result<Vec<GradeTemplate>> {
        self.list_templates_impl(course_id).await
    }

    // 通知模块
    async fn create_notification(
        &self,
        notification: GradeNotification,
    ) -> Result<GradeNotification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications(&self, user_id: &str) -> Result<Vec<GradeNotification>> {
        self.list_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: &str) -> Result<bool> {
        self.mark_notification_read_impl(id).await
    }

    // 导出
    async fn export_grades(&self, request: &GradeExportRequest) -> Result<Vec<u8>> {
        self.export_grades_impl(request).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn storage(server: &MockServer, token: &str) -> HttpStorage {
        HttpStorage::new(&StorageConfig {
            storage_type: "http".to_string(),
            base_url: format!("{}/", server.uri()),
            api_token: token.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn grade_json(id: &str, score: f64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "submissionId": "s1",
            "assignmentId": "a1",
            "studentId": "u1",
            "gradedBy": "t1",
            "gradedAt": "2025-03-01T08:00:00Z",
            "score": score,
            "maxScore": 100.0,
            "createdAt": "2025-03-01T08:00:00Z",
            "updatedAt": "2025-03-01T08:00:00Z"
        })
    }

    fn envelope(data: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "version": 1,
            "code": 0,
            "message": "ok",
            "data": data,
            "timestamp": "2025-03-01T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_get_grade_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/grades/g1"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(grade_json("g1", 88.0))))
            .mount(&server)
            .await;

        let grade = storage(&server, "secret").get_grade("g1").await.unwrap().unwrap();
        assert_eq!(grade.id, "g1");
        assert_eq!(grade.score, 88.0);
    }

    #[tokio::test]
    async fn test_missing_grade_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/grades/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        assert!(storage(&server, "").get_grade("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_grades_sends_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/grades"))
            .and(query_param("assignmentId", "a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!([
                grade_json("g1", 70.0),
                grade_json("g2", 90.0)
            ]))))
            .mount(&server)
            .await;

        let grades = storage(&server, "")
            .list_grades(&GradeFilter::for_assignment("a1"))
            .await
            .unwrap();
        assert_eq!(grades.len(), 2);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        let conflict = serde_json::json!({
            "version": 1,
            "code": 409,
            "message": "pending review exists",
            "timestamp": "2025-03-01T08:00:00Z"
        });
        Mock::given(method("POST"))
            .and(path("/grade-reviews"))
            .respond_with(ResponseTemplate::new(409).set_body_json(conflict))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/grades"))
            .respond_with(ResponseTemplate::new(422).set_body_string("score out of range"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/grades/g1/history"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let storage = storage(&server, "");
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let review = GradeReview {
            id: "r1".to_string(),
            grade_id: "g1".to_string(),
            requested_by: "u1".to_string(),
            requested_at: at,
            reason: "recheck".to_string(),
            status: crate::models::reviews::entities::ReviewStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            decision: None,
        };
        let err = storage.create_review(review).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "pending review exists");

        let grade: Grade = serde_json::from_value(grade_json("g1", 10.0)).unwrap();
        let err = storage.create_grade(grade).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = storage.list_history("g1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_envelope_version_and_code_checked() {
        let server = MockServer::start().await;
        let mut wrong_version = envelope(grade_json("g1", 1.0));
        wrong_version["version"] = serde_json::json!(2);
        Mock::given(method("GET"))
            .and(path("/grades/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(wrong_version))
            .mount(&server)
            .await;
        let mut failed = envelope(serde_json::Value::Null);
        failed["code"] = serde_json::json!(5001);
        Mock::given(method("GET"))
            .and(path("/grades/g2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(failed))
            .mount(&server)
            .await;

        let storage = storage(&server, "");
        let err = storage.get_grade("g1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        let err = storage.get_grade("g2").await.unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_export_returns_raw_bytes() {
        let server = MockServer::start().await;
        let request = GradeExportRequest {
            assignment_id: Some("a1".to_string()),
            ..Default::default()
        };
        Mock::given(method("POST"))
            .and(path("/grades/export"))
            .and(body_json(serde_json::to_value(&request).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"id,score\n".to_vec()))
            .mount(&server)
            .await;

        let bytes = storage(&server, "").export_grades(&request).await.unwrap();
        assert_eq!(bytes, b"id,score\n".to_vec());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/grades/g9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(!storage(&server, "").delete_grade("g9").await.unwrap());
    }

    #[tokio::test]
    async fn test_notification_routes() {
        let server = MockServer::start().await;
        let notification = serde_json::json!({
            "id": "n1",
            "userId": "u1",
            "type": "grade_updated",
            "gradeId": "g1",
            "message": "score changed",
            "read": false,
            "createdAt": "2025-03-01T08:00:00Z"
        });
        Mock::given(method("GET"))
            .and(path("/grades/notifications/u1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!([notification]))),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/grades/notifications/n1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::Value::Null)))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/grades/notifications/n9/read"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let storage = storage(&server, "");
        let listed = storage.list_notifications("u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].notification_type,
            crate::models::notifications::entities::NotificationType::GradeUpdated
        );
        assert!(storage.mark_notification_read("n1").await.unwrap());
        assert!(!storage.mark_notification_read("n9").await.unwrap());
    }
}

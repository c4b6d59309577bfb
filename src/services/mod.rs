pub mod disputes;
pub mod events;
pub mod grades;
pub mod locks;
pub mod notifications;
pub mod reviews;
pub mod statistics;
pub mod templates;
pub mod trends;

use std::sync::Arc;

pub use disputes::DisputeService;
pub use events::{EventBus, GradeEvent, Subscription};
pub use grades::GradeService;
pub use locks::{GraderLock, GraderLockService};
pub use notifications::NotificationService;
pub use reviews::ReviewService;
pub use statistics::StatisticsService;
pub use templates::TemplateService;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::grades::{
    requests::GradeFilter,
    stats_responses::{GradeAnalytics, GradeTrends},
};
use crate::storage::Storage;

/// 评分引擎：把各个服务装配到同一个存储、缓存和事件总线上
pub struct GradingEngine {
    pub grades: Arc<GradeService>,
    pub statistics: StatisticsService,
    pub reviews: ReviewService,
    pub disputes: DisputeService,
    pub templates: TemplateService,
    pub notifications: NotificationService,
    pub locks: GraderLockService,
    events: Arc<EventBus>,
}

impl GradingEngine {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>, config: &AppConfig) -> Self {
        let events = Arc::new(EventBus::new());
        let grades = Arc::new(GradeService::new(
            storage,
            cache.clone(),
            events.clone(),
            config.grading.clone(),
        ));

        Self {
            statistics: StatisticsService::new(
                grades.clone(),
                cache,
                &config.cache,
                &config.grading,
            ),
            reviews: ReviewService::new(grades.clone(), events.clone()),
            disputes: DisputeService::new(grades.clone(), events.clone()),
            templates: TemplateService::new(grades.clone()),
            notifications: NotificationService::new(grades.clone()),
            locks: GraderLockService::new(),
            grades,
            events,
        }
    }

    /// 订阅所有评分、复核、申诉事件
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GradeEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    /// 学生的成绩趋势，可限定作业
    pub async fn student_trends(
        &self,
        student_id: &str,
        assignment_id: Option<&str>,
    ) -> Result<GradeTrends> {
        let filter = GradeFilter {
            student_id: Some(student_id.to_string()),
            assignment_id: assignment_id.map(str::to_string),
            ..Default::default()
        };
        let grades = self.grades.list(&filter).await?;
        Ok(trends::classify(&grades))
    }

    /// 按筛选条件取出评分后做课程分析
    pub async fn course_analytics(
        &self,
        filter: &GradeFilter,
        assignment_filter: Option<&str>,
    ) -> Result<GradeAnalytics> {
        let grades = self.grades.list(filter).await?;
        self.statistics.analytics(&grades, assignment_filter)
    }
}

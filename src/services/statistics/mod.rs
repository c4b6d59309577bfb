pub mod analytics;
pub mod compute;

use std::sync::Arc;

use tracing::debug;

pub use compute::{
    compute_statistics, compute_statistics_with_total, grade_band, grade_distribution,
    grading_speed,
};

use crate::cache::{ObjectCache, statistics_key};
use crate::config::{CacheConfig, GradingConfig};
use crate::errors::{GradingError, Result};
use crate::models::grades::{
    entities::Grade,
    requests::GradeFilter,
    stats_responses::{GradeAnalytics, GradeStatistics},
};
use crate::services::grades::GradeService;

/// 统计服务：按作业缓存统计结果
pub struct StatisticsService {
    grades: Arc<GradeService>,
    cache: Arc<dyn ObjectCache>,
    cache_ttl: u64,
    max_grades: usize,
}

impl StatisticsService {
    pub fn new(
        grades: Arc<GradeService>,
        cache: Arc<dyn ObjectCache>,
        cache_config: &CacheConfig,
        grading_config: &GradingConfig,
    ) -> Self {
        Self {
            grades,
            cache,
            cache_ttl: cache_config.default_ttl,
            max_grades: grading_config.statistics_max_grades,
        }
    }

    fn check_size(&self, count: usize) -> Result<()> {
        if count > self.max_grades {
            return Err(GradingError::validation(format!(
                "统计最多支持 {} 条评分，实际 {count}",
                self.max_grades
            )));
        }
        Ok(())
    }

    /// 作业统计，命中缓存时直接返回
    pub async fn assignment_statistics(&self, assignment_id: &str) -> Result<GradeStatistics> {
        let key = statistics_key(assignment_id);
        if let Some(stats) = self.cache.get::<GradeStatistics>(&key).await {
            debug!("Statistics cache hit for assignment {}", assignment_id);
            return Ok(stats);
        }
        debug!("Statistics cache miss for assignment {}", assignment_id);

        let grades = self
            .grades
            .list(&GradeFilter::for_assignment(assignment_id))
            .await?;
        self.check_size(grades.len())?;

        let stats = compute_statistics(&grades);
        self.cache.insert(key, &stats, self.cache_ttl).await;
        Ok(stats)
    }

    /// 作业统计，进度按已知提交总数计算（不缓存）
    pub async fn assignment_statistics_with_total(
        &self,
        assignment_id: &str,
        total_submissions: u64,
    ) -> Result<GradeStatistics> {
        let grades = self
            .grades
            .list(&GradeFilter::for_assignment(assignment_id))
            .await?;
        self.check_size(grades.len())?;
        Ok(compute_statistics_with_total(&grades, total_submissions))
    }

    /// 丢弃作业的缓存统计
    pub async fn invalidate(&self, assignment_id: &str) {
        self.cache.remove(&statistics_key(assignment_id)).await;
    }

    /// 课程成绩分析
    pub fn analytics(
        &self,
        course_grades: &[Grade],
        assignment_filter: Option<&str>,
    ) -> Result<GradeAnalytics> {
        self.check_size(course_grades.len())?;
        Ok(analytics::build_analytics(course_grades, assignment_filter))
    }
}

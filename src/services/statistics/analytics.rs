use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::compute::compute_statistics;
use crate::models::grades::{
    entities::Grade,
    stats_responses::{AnalyticsTrends, AverageScorePoint, GradeAnalytics, GradingSpeedPoint},
};
use crate::utils::validate::round2;

fn group_by<F>(grades: &[&Grade], key: F) -> BTreeMap<String, Vec<Grade>>
where
    F: Fn(&Grade) -> &str,
{
    let mut groups: BTreeMap<String, Vec<Grade>> = BTreeMap::new();
    for grade in grades {
        groups
            .entry(key(grade).to_string())
            .or_default()
            .push((*grade).clone());
    }
    groups
}

/// 按 UTC 日期分桶的趋势序列，日期升序
fn daily_trends(grades: &[&Grade]) -> AnalyticsTrends {
    let mut days: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
    for grade in grades {
        let entry = days.entry(grade.graded_at.date_naive()).or_insert((0.0, 0));
        entry.0 += grade.score;
        entry.1 += 1;
    }

    let mut trends = AnalyticsTrends::default();
    for (date, (total, count)) in days {
        trends.average_scores.push(AverageScorePoint {
            date,
            score: round2(total / count as f64),
        });
        trends.grading_speed.push(GradingSpeedPoint {
            date,
            submissions: count,
        });
    }
    trends
}

pub fn build_analytics(course_grades: &[Grade], assignment_filter: Option<&str>) -> GradeAnalytics {
    let selected: Vec<&Grade> = course_grades
        .iter()
        .filter(|g| assignment_filter.is_none_or(|id| g.assignment_id == id))
        .collect();
    let owned: Vec<Grade> = selected.iter().map(|g| (*g).clone()).collect();

    GradeAnalytics {
        overall_stats: compute_statistics(&owned),
        per_assignment: group_by(&selected, |g| g.assignment_id.as_str())
            .into_iter()
            .map(|(id, grades)| (id, compute_statistics(&grades)))
            .collect(),
        per_student: group_by(&selected, |g| g.student_id.as_str())
            .into_iter()
            .map(|(id, grades)| (id, compute_statistics(&grades)))
            .collect(),
        trends: daily_trends(&selected),
    }
}

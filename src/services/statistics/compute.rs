//! 分数统计的纯函数部分

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::grades::{
    entities::Grade,
    stats_responses::{GradeStatistics, GradingProgress},
};
use crate::utils::validate::round2;

/// 百分比所属的等级区间
pub fn grade_band(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A (90-100%)"
    } else if percentage >= 80.0 {
        "B (80-89%)"
    } else if percentage >= 70.0 {
        "C (70-79%)"
    } else if percentage >= 60.0 {
        "D (60-69%)"
    } else {
        "F (<60%)"
    }
}

/// 等级分布，只包含出现过的区间
pub fn grade_distribution(grades: &[Grade]) -> BTreeMap<String, u64> {
    let mut distribution = BTreeMap::new();
    for grade in grades {
        *distribution
            .entry(grade_band(grade.percentage()).to_string())
            .or_insert(0) += 1;
    }
    distribution
}

/// 计算统计数据
///
/// 只能看到已评分的记录，因此进度固定为全部完成；
/// 已知提交总数时使用 [`compute_statistics_with_total`]。
pub fn compute_statistics(grades: &[Grade]) -> GradeStatistics {
    let n = grades.len() as u64;
    let progress = if n == 0 {
        GradingProgress::default()
    } else {
        GradingProgress {
            total_submissions: n,
            graded_submissions: n,
            pending_submissions: 0,
            percentage: 100.0,
        }
    };
    summarize(grades, progress)
}

/// 计算统计数据，进度按提交总数计算
pub fn compute_statistics_with_total(grades: &[Grade], total_submissions: u64) -> GradeStatistics {
    let graded = grades.len() as u64;
    let total = total_submissions.max(graded);
    let percentage = if total == 0 {
        0.0
    } else {
        round2(graded as f64 / total as f64 * 100.0)
    };
    summarize(
        grades,
        GradingProgress {
            total_submissions: total,
            graded_submissions: graded,
            pending_submissions: total - graded,
            percentage,
        },
    )
}

fn summarize(grades: &[Grade], grading_progress: GradingProgress) -> GradeStatistics {
    if grades.is_empty() {
        return GradeStatistics {
            grading_progress,
            ..Default::default()
        };
    }

    let mut scores: Vec<f64> = grades.iter().map(|g| g.score).collect();
    scores.sort_by(f64::total_cmp);

    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    // 总体标准差
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    GradeStatistics {
        total_grades: scores.len() as u64,
        average_score: round2(mean),
        // 偶数个时取 n/2 位置，不取两数平均
        median_score: scores[scores.len() / 2],
        standard_deviation: round2(variance.sqrt()),
        min_score: scores[0],
        max_score: scores[scores.len() - 1],
        grade_distribution: grade_distribution(grades),
        grading_progress,
    }
}

/// 批改速度：每小时完成的评分数
pub fn grading_speed(grades: &[Grade], now: DateTime<Utc>) -> f64 {
    let Some(earliest) = grades.iter().map(|g| g.graded_at).min() else {
        return 0.0;
    };
    let hours = (now - earliest).num_milliseconds() as f64 / 3_600_000.0;
    if hours <= 0.0 {
        return 0.0;
    }
    grades.len() as f64 / hours
}

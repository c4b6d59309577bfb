//! 成绩趋势分类
//!
//! 按评分时间排序后逐对比较相邻两条记录，不做回归或滑动平均。

use crate::models::grades::{entities::Grade, stats_responses::GradeTrends};

pub fn classify(grades: &[Grade]) -> GradeTrends {
    let mut sorted = grades.to_vec();
    // sort_by 是稳定排序，同一时间的记录保持输入顺序
    sorted.sort_by(|a, b| a.graded_at.cmp(&b.graded_at));

    let mut trends = GradeTrends::default();
    if sorted.len() < 2 {
        trends.stable = sorted;
        return trends;
    }

    for pair in sorted.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.score > previous.score {
            trends.improving.push(current.clone());
        } else if current.score < previous.score {
            trends.declining.push(current.clone());
        } else {
            trends.stable.push(current.clone());
        }
    }
    trends
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn series(scores: &[f64]) -> Vec<Grade> {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let at = start + Duration::days(i as i64);
                Grade {
                    id: format!("t{}", i + 1),
                    submission_id: format!("s{i}"),
                    assignment_id: format!("a{i}"),
                    student_id: "u1".to_string(),
                    graded_by: "t1".to_string(),
                    graded_at: at,
                    score,
                    max_score: 100.0,
                    feedback: String::new(),
                    rubric_id: None,
                    rubric_grades: vec![],
                    created_at: at,
                    updated_at: at,
                }
            })
            .collect()
    }

    fn ids(grades: &[Grade]) -> Vec<&str> {
        grades.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn test_adjacent_pairs() {
        let mut grades = series(&[70.0, 75.0, 75.0, 60.0]);
        grades.reverse();
        let trends = classify(&grades);

        assert_eq!(ids(&trends.improving), vec!["t2"]);
        assert_eq!(ids(&trends.stable), vec!["t3"]);
        assert_eq!(ids(&trends.declining), vec!["t4"]);
    }

    #[test]
    fn test_short_input_is_stable() {
        assert_eq!(classify(&[]), GradeTrends::default());

        let single = series(&[42.0]);
        let trends = classify(&single);
        assert_eq!(ids(&trends.stable), vec!["t1"]);
        assert!(trends.improving.is_empty());
        assert!(trends.declining.is_empty());
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{GradingError, Result};
use crate::models::grades::entities::RubricGrade;

// 评分量规模式
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub enum RubricMode {
    #[default]
    Matrix, // 矩阵模式：每个评分项按等级给分
    Simple, // 简单模式：每个评分项只有权重（满分）
}

// 评分等级
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct Level {
    pub id: String,
    pub label: String,
    pub points: f64,
}

// 评分项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct Criterion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 简单模式下即该项满分，必须为正整数
    pub weight: f64,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Criterion {
    pub fn level(&self, level_id: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == level_id)
    }

    /// 矩阵模式下该项可得最高分
    pub fn max_points(&self) -> f64 {
        self.levels
            .iter()
            .map(|l| l.points)
            .fold(0.0_f64, f64::max)
    }
}

// 评分量规（发布后不可变）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct Rubric {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: RubricMode,
    pub criteria: Vec<Criterion>,
}

impl Rubric {
    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == criterion_id)
    }

    /// 量规总分
    pub fn total_points(&self) -> f64 {
        match self.mode {
            RubricMode::Matrix => self.criteria.iter().map(Criterion::max_points).sum(),
            RubricMode::Simple => self.criteria.iter().map(|c| c.weight).sum(),
        }
    }

    /// 校验量规结构
    pub fn validate(&self) -> Result<()> {
        if self.criteria.is_empty() {
            return Err(GradingError::validation(format!(
                "量规 {} 至少需要一个评分项",
                self.id
            )));
        }

        let mut criterion_ids = HashSet::new();
        for criterion in &self.criteria {
            if !criterion_ids.insert(criterion.id.as_str()) {
                return Err(GradingError::validation(format!(
                    "评分项 ID 重复: {}",
                    criterion.id
                )));
            }

            match self.mode {
                RubricMode::Simple => {
                    if criterion.weight <= 0.0 || criterion.weight.fract() != 0.0 {
                        return Err(GradingError::validation(format!(
                            "评分项 {} 的权重必须为正整数",
                            criterion.id
                        )));
                    }
                }
                RubricMode::Matrix => {
                    if criterion.levels.is_empty() {
                        return Err(GradingError::validation(format!(
                            "评分项 {} 至少需要一个等级",
                            criterion.id
                        )));
                    }
                }
            }

            let mut level_ids = HashSet::new();
            let mut level_points: Vec<f64> = Vec::with_capacity(criterion.levels.len());
            for level in &criterion.levels {
                if !level_ids.insert(level.id.as_str()) {
                    return Err(GradingError::validation(format!(
                        "评分项 {} 中等级 ID 重复: {}",
                        criterion.id, level.id
                    )));
                }
                if !level.points.is_finite() || level.points < 0.0 {
                    return Err(GradingError::validation(format!(
                        "等级 {} 的分值必须为非负数",
                        level.id
                    )));
                }
                if level_points.contains(&level.points) {
                    return Err(GradingError::validation(format!(
                        "评分项 {} 中等级分值重复: {}",
                        criterion.id, level.points
                    )));
                }
                level_points.push(level.points);
            }
        }

        Ok(())
    }

    /// 根据所选等级生成评分明细与总分（仅矩阵模式）
    pub fn score_selections(
        &self,
        selections: &[(&str, &str)],
    ) -> Result<(Vec<RubricGrade>, f64)> {
        if self.mode != RubricMode::Matrix {
            return Err(GradingError::validation("简单模式量规不支持按等级评分"));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(selections.len());
        let mut total = 0.0;

        for &(criterion_id, level_id) in selections {
            if !seen.insert(criterion_id) {
                return Err(GradingError::validation(format!(
                    "评分项 {criterion_id} 被重复评分"
                )));
            }
            let criterion = self.criterion(criterion_id).ok_or_else(|| {
                GradingError::validation(format!("量规中不存在评分项: {criterion_id}"))
            })?;
            let level = criterion.level(level_id).ok_or_else(|| {
                GradingError::validation(format!(
                    "评分项 {criterion_id} 中不存在等级: {level_id}"
                ))
            })?;

            total += level.points;
            entries.push(RubricGrade {
                criterion_id: criterion.id.clone(),
                level_id: level.id.clone(),
                points_awarded: level.points,
                feedback: String::new(),
            });
        }

        Ok((entries, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: &str, points: f64) -> Level {
        Level {
            id: id.to_string(),
            label: id.to_uppercase(),
            points,
        }
    }

    fn criterion(id: &str, weight: f64, levels: Vec<Level>) -> Criterion {
        Criterion {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            weight,
            levels,
        }
    }

    fn matrix_rubric() -> Rubric {
        Rubric {
            id: "r1".to_string(),
            name: "Essay".to_string(),
            description: None,
            mode: RubricMode::Matrix,
            criteria: vec![
                criterion(
                    "grammar",
                    1.0,
                    vec![level("poor", 1.0), level("fair", 3.0), level("excellent", 5.0)],
                ),
                criterion(
                    "logic",
                    1.0,
                    vec![level("poor", 2.0), level("good", 6.0), level("excellent", 10.0)],
                ),
            ],
        }
    }

    #[test]
    fn test_matrix_total_points() {
        let rubric = matrix_rubric();
        assert!(rubric.validate().is_ok());
        assert_eq!(rubric.total_points(), 15.0);
    }

    #[test]
    fn test_simple_total_points() {
        let rubric = Rubric {
            mode: RubricMode::Simple,
            criteria: vec![criterion("a", 40.0, vec![]), criterion("b", 60.0, vec![])],
            ..matrix_rubric()
        };
        assert!(rubric.validate().is_ok());
        assert_eq!(rubric.total_points(), 100.0);
    }

    #[test]
    fn test_simple_weight_must_be_positive_integer() {
        let rubric = Rubric {
            mode: RubricMode::Simple,
            criteria: vec![criterion("a", 2.5, vec![])],
            ..matrix_rubric()
        };
        assert!(rubric.validate().is_err());

        let rubric = Rubric {
            mode: RubricMode::Simple,
            criteria: vec![criterion("a", 0.0, vec![])],
            ..matrix_rubric()
        };
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_duplicate_level_points_rejected() {
        let mut rubric = matrix_rubric();
        rubric.criteria[0].levels.push(level("also_fair", 3.0));
        let err = rubric.validate().unwrap_err();
        assert!(err.message().contains("分值重复"));
    }

    #[test]
    fn test_empty_rubric_rejected() {
        let rubric = Rubric {
            criteria: vec![],
            ..matrix_rubric()
        };
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_score_selections() {
        let rubric = matrix_rubric();
        let (entries, total) = rubric
            .score_selections(&[("grammar", "fair"), ("logic", "excellent")])
            .unwrap();
        assert_eq!(total, 13.0);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].points_awarded, 10.0);
    }

    #[test]
    fn test_score_selections_unknown_level() {
        let rubric = matrix_rubric();
        assert!(rubric.score_selections(&[("grammar", "nope")]).is_err());
        assert!(rubric.score_selections(&[("style", "poor")]).is_err());
        assert!(
            rubric
                .score_selections(&[("grammar", "poor"), ("grammar", "fair")])
                .is_err()
        );
    }
}

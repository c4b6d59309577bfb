use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Grade;
use crate::errors::{ErrorKind, GradingError};

/// 批量操作中失败的单条记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct BatchFailure {
    pub id: String,
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl BatchFailure {
    pub fn from_error(id: impl Into<String>, err: &GradingError) -> Self {
        Self {
            id: id.into(),
            code: err.code().to_string(),
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

/// 批量更新/模板应用结果
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct BulkUpdateResult {
    pub succeeded: Vec<Grade>,
    pub failed: Vec<BatchFailure>,
}

impl BulkUpdateResult {
    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.succeeded.iter().map(|g| g.id.as_str()).collect()
    }

    pub fn failure_for(&self, id: &str) -> Option<&BatchFailure> {
        self.failed.iter().find(|f| f.id == id)
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 评分预校验结果
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// 导入失败的行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

/// 导入结果汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ImportSummary {
    pub applied: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: Vec<ImportRowError>,
}

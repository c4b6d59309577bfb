use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{GradingError, Result};

/// 当前支持的响应结构版本
pub const API_SCHEMA_VERSION: u16 = 1;

/// 成功响应代码
pub const SUCCESS_CODE: i32 = 0;

// 统一的API响应结构（带版本号）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub version: u16,
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    /// 校验版本与响应代码并取出数据
    ///
    /// 所有后端 JSON 响应都经过这里解包，调用方不再各自猜测结构。
    pub fn into_result(self) -> Result<Option<T>> {
        if self.version != API_SCHEMA_VERSION {
            return Err(GradingError::serialization(format!(
                "不支持的响应版本: {} (期望 {API_SCHEMA_VERSION})",
                self.version
            )));
        }
        if self.code != SUCCESS_CODE {
            return Err(GradingError::storage_operation(format!(
                "后端返回错误 {}: {}",
                self.code, self.message
            )));
        }
        Ok(self.data)
    }

    /// 同 `into_result`，但要求 data 必须存在
    pub fn into_data(self) -> Result<T> {
        self.into_result()?
            .ok_or_else(|| GradingError::serialization("响应缺少 data 字段"))
    }
}

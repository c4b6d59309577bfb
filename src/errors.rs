//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和错误类别。

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 错误类别
///
/// 调用方（UI 层）据此决定如何向用户展示错误，批量操作的失败项也携带该字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum ErrorKind {
    Validation,
    Conflict,
    InvalidState,
    NotFound,
    Backend,
    Serialization,
    Config,
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - kind() 方法 - 返回错误类别
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_grading_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $kind:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradingError {
            $($variant(String),)*
        }

        impl GradingError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误类别
            pub fn kind(&self) -> ErrorKind {
                match self {
                    $(GradingError::$variant(_) => ErrorKind::$kind,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradingError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradingError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradingError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_grading_errors! {
    Validation("E001", "Validation Error", Validation),
    Conflict("E002", "Conflict Error", Conflict),
    InvalidState("E003", "Invalid State Error", InvalidState),
    NotFound("E004", "Resource Not Found", NotFound),
    StorageConnection("E005", "Storage Connection Error", Backend),
    StorageOperation("E006", "Storage Operation Error", Backend),
    StoragePluginNotFound("E007", "Storage Plugin Not Found", Config),
    Serialization("E008", "Serialization Error", Serialization),
    Config("E009", "Configuration Error", Config),
}

impl GradingError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradingError {}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for GradingError {
    fn from(err: serde_json::Error) -> Self {
        GradingError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for GradingError {
    fn from(err: config::ConfigError) -> Self {
        GradingError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for GradingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GradingError::Serialization(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            GradingError::StorageConnection(err.to_string())
        } else {
            GradingError::StorageOperation(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GradingError>;

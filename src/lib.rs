//! 评分引擎
//!
//! 基于量规的评分记录、复核/申诉流程与成绩统计。
//!
//! # 架构
//! - `cache`: 统计结果缓存（Moka）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `runtime`: 日志与启动装配
//! - `services`: 业务逻辑层
//! - `storage`: 存储边界（内存 / HTTP 后端）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

pub use errors::{ErrorKind, GradingError, Result};
pub use services::GradingEngine;

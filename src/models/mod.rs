//! 数据模型定义
//!
//! 所有记录都是值类型，彼此之间只通过 ID 关联。

pub mod common;
pub mod disputes;
pub mod grades;
pub mod notifications;
pub mod reviews;
pub mod rubrics;
pub mod templates;
pub mod users;

pub use common::response::{API_SCHEMA_VERSION, ApiResponse};

//! 缓存层
//!
//! 统计结果按作业缓存，评分发生变更时只失效对应作业的键。

pub mod object_cache;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

pub use object_cache::moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
}

impl dyn ObjectCache {
    /// 读取并反序列化；内容损坏时当作未命中
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    self.remove(key).await;
                    None
                }
            },
            CacheResult::NotFound => None,
        }
    }

    /// 序列化后写入
    pub async fn insert<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: u64) {
        let key = key.into();
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }
}

/// 作业统计的缓存键
pub fn statistics_key(assignment_id: &str) -> String {
    format!("grading:stats:{assignment_id}")
}

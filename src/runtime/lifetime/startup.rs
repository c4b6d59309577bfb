use std::sync::Arc;

use dotenv::dotenv;
use tracing::{debug, warn};

use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::GradingEngine;

/// 创建缓存实例
fn create_cache(config: &AppConfig) -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::new(&config.cache))
}

/// 准备评分引擎
/// 包括存储、缓存和服务装配
pub async fn prepare_engine(config: &AppConfig) -> Result<GradingEngine> {
    dotenv().ok();

    if cfg!(debug_assertions) {
        crate::storage::register::debug_storage_registry();
        debug!("Debug mode: Storage registry is enabled");
    }

    warn!(
        "Attempting to create {} storage backend",
        config.storage.storage_type
    );
    let storage = crate::storage::create_storage(&config.storage).await?;
    warn!("Storage backend initialized");

    let cache = create_cache(config);
    warn!("Cache backend initialized");

    Ok(GradingEngine::new(storage, cache, config))
}

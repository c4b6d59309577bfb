use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use super::{Storage, http_storage::HttpStorage, memory_storage::MemoryStorage};
use crate::config::StorageConfig;
use crate::errors::Result;

pub type BoxedStorageFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn Storage>>> + Send>>;
pub type StorageConstructor = Arc<dyn Fn(StorageConfig) -> BoxedStorageFuture + Send + Sync>;

static STORAGE_REGISTRY: Lazy<RwLock<HashMap<String, StorageConstructor>>> = Lazy::new(|| {
    let mut registry: HashMap<String, StorageConstructor> = HashMap::new();

    registry.insert(
        "memory".to_string(),
        Arc::new(|_config| {
            Box::pin(async { Ok(Arc::new(MemoryStorage::new()) as Arc<dyn Storage>) })
        }),
    );
    registry.insert(
        "http".to_string(),
        Arc::new(|config| {
            Box::pin(async move {
                let storage = HttpStorage::new(&config)?;
                Ok(Arc::new(storage) as Arc<dyn Storage>)
            })
        }),
    );

    RwLock::new(registry)
});

pub fn register_storage_plugin<S: Into<String>>(name: S, constructor: StorageConstructor) {
    let name = name.into();
    let mut registry = STORAGE_REGISTRY
        .write()
        .expect("Storage registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_storage_plugin(name: &str) -> Option<StorageConstructor> {
    STORAGE_REGISTRY
        .read()
        .expect("Storage registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_storage_registry() {
    let registry = STORAGE_REGISTRY
        .read()
        .expect("Storage registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No storage plugins registered.");
    } else {
        tracing::debug!("Registered storage plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}

use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub grading: GradingConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub environment: String,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// 存储后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub base_url: String,
    #[serde(skip_serializing, default)] // 不序列化到输出中
    pub api_token: String,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "memory".to_string(),
            base_url: "http://localhost:8000/api/v1".to_string(),
            api_token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_ttl: u64,
    pub memory: MemoryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            memory: MemoryConfig::default(),
        }
    }
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// 评分引擎限制
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub max_batch_size: usize,        // 批量更新/模板应用单次最多记录数
    pub statistics_max_grades: usize, // 单次统计最多评分数
    pub max_import_rows: usize,       // 单次导入最多行数
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 500,
            statistics_max_grades: 100_000,
            max_import_rows: 1000,
        }
    }
}

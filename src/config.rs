//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息
//!
//! 配置在进程启动时加载一次，之后不可变，通过 `Arc` 注入各组件。

use crate::telemetry::LogFormat;
use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// 令牌有效期上限（30 天）
pub const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 请求体最大字节数
    pub max_body_bytes: usize,
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 存储后端: postgres, memory
    pub backend: StorageBackend,
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// JWT 签名密钥（使用 Secret 包装，防止日志泄露）
    pub jwt_secret: Secret<String>,
    /// 令牌有效期（秒）。未设置时令牌不含 exp，永久有效
    pub token_ttl_secs: Option<u64>,
    /// 密码哈希工作因子（Argon2 迭代次数）
    pub hash_work_factor: u32,
    /// 密码哈希内存开销（KiB）
    pub hash_memory_kib: u32,
    /// 密码哈希并行度
    pub hash_parallelism: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.max_body_bytes", 64 * 1024)?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.jwt_secret", "change-this-secret-in-production-min-32-chars!")?
            .set_default("security.hash_work_factor", 3)?
            .set_default("security.hash_memory_kib", 19456)?
            .set_default("security.hash_parallelism", 1)?;

        // 从环境变量加载配置（前缀为 AUTHGATE_）
        settings = settings.add_source(
            Environment::with_prefix("AUTHGATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        self.logging
            .format
            .parse::<LogFormat>()
            .map_err(ConfigError::Message)?;

        // 验证数据库连接池配置
        if self.database.backend == StorageBackend::Postgres {
            if self.database.url.expose_secret().is_empty() {
                return Err(ConfigError::Message(
                    "database.url is required for the postgres backend".to_string(),
                ));
            }
            if self.database.max_connections < self.database.min_connections {
                return Err(ConfigError::Message(
                    "max_connections must be >= min_connections".to_string(),
                ));
            }
        }

        // 验证 JWT 密钥长度（至少 32 字符）
        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if let Some(ttl) = self.security.token_ttl_secs {
            if !(60..=MAX_TOKEN_TTL_SECS).contains(&ttl) {
                return Err(ConfigError::Message(format!(
                    "token_ttl_secs must be between 60 and {} when set",
                    MAX_TOKEN_TTL_SECS
                )));
            }
        }

        // 验证哈希参数
        if !(1..=10).contains(&self.security.hash_work_factor) {
            return Err(ConfigError::Message(
                "hash_work_factor must be between 1 and 10".to_string(),
            ));
        }

        if self.security.hash_parallelism == 0 {
            return Err(ConfigError::Message("hash_parallelism must be >= 1".to_string()));
        }

        // Argon2 要求内存 >= 8 * 并行度
        if self.security.hash_memory_kib < 8 * self.security.hash_parallelism {
            return Err(ConfigError::Message(
                "hash_memory_kib must be at least 8 * hash_parallelism".to_string(),
            ));
        }

        Ok(())
    }
}

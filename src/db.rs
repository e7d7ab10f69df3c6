//! 存储初始化与健康检查
//! 按 `database.backend` 选择 PostgreSQL（连接池 + 内嵌迁移）或内存存储

use crate::{
    config::{DatabaseConfig, StorageBackend},
    repository::{MemoryPostStore, MemoryUserStore, PgPostStore, PgUserStore, PostStore, UserStore},
};
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

/// 存储初始化错误，经 `AppError::Storage` 进入统一错误模型
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("cannot connect to postgres: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[source] MigrateError),
}

/// 已选定后端的用户与文章存储
#[derive(Clone)]
pub struct Storage {
    /// 仅 PostgreSQL 后端持有连接池
    pool: Option<PgPool>,
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
}

impl Storage {
    /// 按配置打开存储；PostgreSQL 后端会先完成迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on exit");
                Ok(Self::memory())
            }
            StorageBackend::Postgres => {
                let pool = open_pool(config).await?;
                migrate(&pool).await?;
                Ok(Self::postgres(pool))
            }
        }
    }

    pub fn memory() -> Self {
        Self {
            pool: None,
            users: Arc::new(MemoryUserStore::new()),
            posts: Arc::new(MemoryPostStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self.pool {
            Some(_) => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        }
    }

    /// 内存存储恒为可用；PostgreSQL 执行一次 `SELECT 1`
    pub async fn health(&self) -> StorageHealth {
        let healthy = match &self.pool {
            None => true,
            Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
                Ok(_) => true,
                Err(e) => {
                    // 具体原因只写日志，不出现在响应里
                    tracing::warn!(error = %e, "Storage health check failed");
                    false
                }
            },
        };

        StorageHealth {
            backend: self.backend(),
            healthy,
        }
    }
}

/// 存储健康检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageHealth {
    pub backend: StorageBackend,
    pub healthy: bool,
}

async fn open_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(config.url.expose_secret())
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(
        max_connections = config.max_connections,
        "Postgres pool ready"
    );
    Ok(pool)
}

/// users / posts 表结构来自 `migrations/`
async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::Migrate)?;

    tracing::info!("Schema up to date");
    Ok(())
}

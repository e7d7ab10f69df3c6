//! 日志初始化
//! `logging.level` 只作用于本服务与 tower-http，其余依赖固定为 warn；
//! 设置了 `RUST_LOG` 时整体以它为准

use crate::{config::LoggingConfig, error::AppError};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 每行一个 JSON 对象，附带当前请求 span 的字段
    Json,
    /// 多行可读格式（开发环境）
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}. Must be one of: json, pretty", s)),
        }
    }
}

/// 未设置 `RUST_LOG` 时使用的过滤指令
pub fn default_directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("warn,authgate={level},tower_http={level}")
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, AppError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(default_directives(&config.level))
        .map_err(|e| AppError::Config(format!("Invalid log level {}: {}", config.level, e)))
}

/// 安装全局 subscriber，进程内只能成功一次
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), AppError> {
    let format = config.format.parse::<LogFormat>().map_err(AppError::Config)?;
    let filter = build_filter(config)?;

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(log_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Logging already initialized: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?format, "Logging initialized");
    Ok(())
}

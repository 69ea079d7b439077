//! hello-config - 配置加载库
//!
//! 所有配置来自进程环境变量（可选 `.env` 文件）。
//! 数据库与 Jaeger 相关变量保持原始值：未设置时为空字符串，不做默认值和校验。

use std::env;
use std::str::FromStr;

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// 拼接 MySQL DSN
    ///
    /// 格式：`user:pass@tcp(host:port)/dbname?charset=utf8mb4&parseTime=True`
    pub fn dsn(&self) -> Secret<String> {
        Secret::new(format!(
            "{}:{}@tcp({}:{})/{}?charset=utf8mb4&parseTime=True",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.name,
        ))
    }
}

/// 分布式追踪配置
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// `JAEGER_AGENT_ENDPOINT`，形如 `host:port`
    pub agent_endpoint: String,
    /// `JAEGER_ENDPOINT`，完整的 collector URL
    pub collector_endpoint: String,
    /// 采样率，1.0 表示全部采样
    pub sampling_ratio: f64,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// 监听地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 遥测配置
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub tracing: TracingConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    ///
    /// 工作目录下存在 `.env` 时先加载，已设置的环境变量不会被覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = |key: &str| lookup(key).unwrap_or_default();
        let or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            app_name: or("APP_NAME", "hello-people"),
            app_env: or("APP_ENV", "development"),
            database: DatabaseConfig {
                user: raw("DB_USER"),
                password: Secret::new(raw("DB_PASS")),
                host: raw("DB_HOST"),
                port: raw("DB_PORT"),
                name: raw("DB_NAME"),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            },
            tracing: TracingConfig {
                agent_endpoint: raw("JAEGER_AGENT_ENDPOINT"),
                collector_endpoint: raw("JAEGER_ENDPOINT"),
                sampling_ratio: parse_or(&lookup, "TRACE_SAMPLING_RATIO", 1.0)?,
            },
            server: ServerConfig {
                host: or("SERVER_HOST", "0.0.0.0"),
                port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            },
            telemetry: TelemetryConfig {
                log_level: or("LOG_LEVEL", "info"),
            },
        })
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

//! MySQL 连接管理

use hello_errors::{AppError, AppResult};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::MySqlDsn;

/// MySQL 连接池配置
#[derive(Clone)]
pub struct MySqlConfig {
    pub dsn: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl std::fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("dsn", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl MySqlConfig {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// 创建 MySQL 连接池
///
/// 建立第一个连接后才返回，连不上即报错
pub async fn create_pool(config: &MySqlConfig) -> AppResult<MySqlPool> {
    let dsn = MySqlDsn::parse(&config.dsn)?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(dsn.connect_options())
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))?;

    info!(
        addr = ?dsn.addr,
        database = %dsn.database,
        max_connections = config.max_connections,
        "MySQL connection pool created"
    );

    Ok(pool)
}

/// 检查数据库连接
pub async fn check_connection(pool: &MySqlPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = MySqlConfig::new("u:p@tcp(db:3306)/app").with_max_connections(25);
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_config_debug_hides_dsn() {
        let config = MySqlConfig::new("u:hunter2@tcp(db:3306)/app");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_invalid_dsn_fails_before_connecting() {
        let config = MySqlConfig::new("not a dsn");
        let err = create_pool(&config).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}

//! 基础设施资源管理
//!
//! 进程内共享的资源：MySQL 连接池与 metrics 注册表

use hello_adapter_mysql::{MySqlConfig, create_pool};
use hello_config::AppConfig;
use hello_errors::AppResult;
use hello_telemetry::MetricsRegistry;
use secrecy::ExposeSecret;
use sqlx::MySqlPool;
use tracing::info;

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化后交给服务构建路由
#[derive(Clone)]
pub struct Infrastructure {
    /// MySQL 连接池
    mysql_pool: MySqlPool,
    /// Metrics 注册表
    metrics: MetricsRegistry,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 数据库连接失败直接返回错误，不重试
    pub async fn from_config(config: &AppConfig, metrics: MetricsRegistry) -> AppResult<Self> {
        let mysql_config = MySqlConfig::new(config.database.dsn().expose_secret().as_str())
            .with_max_connections(config.database.max_connections);
        let mysql_pool = create_pool(&mysql_config).await?;

        info!(
            max_connections = config.database.max_connections,
            "Infrastructure initialized"
        );

        Ok(Self::new(mysql_pool, metrics))
    }

    /// 用已有资源组装
    pub fn new(mysql_pool: MySqlPool, metrics: MetricsRegistry) -> Self {
        Self {
            mysql_pool,
            metrics,
        }
    }

    pub fn mysql_pool(&self) -> MySqlPool {
        self.mysql_pool.clone()
    }

    pub fn metrics(&self) -> MetricsRegistry {
        self.metrics.clone()
    }
}

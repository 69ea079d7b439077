//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use hello_config::AppConfig;
use hello_errors::AppResult;
use hello_telemetry::{MetricsRegistry, TracingPipeline, uses_udp_agent_port};
use tracing::{error, info, warn};

use crate::app::build_app;
use crate::health::health_routes;
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 启动顺序严格串行，任何一步失败都返回错误，由 `main` 以非零码退出：
/// 1. 加载配置
/// 2. 创建 metrics 注册表
/// 3. 创建追踪导出器并注册为进程级 provider
/// 4. 初始化日志
/// 5. 连接数据库
/// 6. 调用用户提供的闭包（迁移、fixtures、业务路由）
/// 7. 监听端口，收到关闭信号后排空请求并刷新追踪数据
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     hello_bootstrap::run(|infra| async move {
///         Ok(routes(infra.mysql_pool()))
///     }).await
/// }
/// ```
pub async fn run<F, Fut>(service_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::from_env()?;

    // 2. 初始化 Metrics 注册表
    let metrics = MetricsRegistry::new(&config.app_name)?;

    // 3. 初始化追踪导出器
    let tracing_pipeline = TracingPipeline::install(&config.app_name, &config.tracing)?;

    // 4. 初始化运行时
    init_runtime(&config, Some(tracing_pipeline.tracer()));

    info!("Starting {} service", config.app_name);
    info!(
        endpoint = tracing_pipeline.endpoint(),
        sampling_ratio = config.tracing.sampling_ratio,
        "Trace exporter installed"
    );
    if uses_udp_agent_port(&config.tracing) {
        warn!(
            agent_endpoint = %config.tracing.agent_endpoint,
            "JAEGER_AGENT_ENDPOINT points at a UDP agent port; traces are sent over OTLP/HTTP and need the collector's OTLP port (usually 4318)"
        );
    }

    let result = serve(config, metrics, service_builder).await;
    if let Err(e) = &result {
        error!(error = %e, "Service terminated with error");
    }

    // 刷新未发送的 span
    tracing_pipeline.shutdown();

    info!("Service stopped");

    result
}

async fn serve<F, Fut>(
    config: AppConfig,
    metrics: MetricsRegistry,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let addr: SocketAddr = config.server.addr().parse()?;

    // 5. 创建基础设施
    let infra = Infrastructure::from_config(&config, metrics.clone()).await?;
    let pool = infra.mysql_pool();

    // 6. 构建业务路由
    let routes = service_builder(infra).await?;
    let app = build_app(routes.merge(health_routes(pool)), metrics);

    // 7. 启动服务器
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

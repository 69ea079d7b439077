//! 分布式追踪导出
//!
//! 通过 OTLP/HTTP 将 span 批量发送到 Jaeger。导出失败只记日志，不影响请求

use hello_config::TracingConfig;
use hello_errors::{AppError, AppResult};
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{Config, Sampler, Tracer, TracerProvider},
};
use tracing::{debug, warn};

/// 追踪管线
///
/// 持有 provider 以便关闭时刷新未发送的 span
pub struct TracingPipeline {
    provider: TracerProvider,
    tracer: Tracer,
    endpoint: String,
}

impl TracingPipeline {
    /// 创建导出器并注册为进程级 provider
    ///
    /// 此时日志订阅器通常还未初始化，安装信息由调用方稍后通过 [`Self::endpoint`] 记录
    pub fn install(service_name: &str, config: &TracingConfig) -> AppResult<Self> {
        let endpoint = resolve_endpoint(&config.agent_endpoint, &config.collector_endpoint)?;

        let exporter = opentelemetry_otlp::new_exporter()
            .http()
            .with_endpoint(endpoint.clone())
            .build_span_exporter()
            .map_err(|e| {
                AppError::external_service(format!("Failed to create trace exporter: {}", e))
            })?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_config(
                Config::default()
                    .with_sampler(sampler_for_ratio(config.sampling_ratio))
                    .with_resource(Resource::new(vec![KeyValue::new(
                        "service.name",
                        service_name.to_string(),
                    )])),
            )
            .build();

        let tracer = provider.tracer(service_name.to_string());

        let _ = global::set_error_handler(|err| {
            debug!(error = %err, "Telemetry export failed");
        });
        global::set_tracer_provider(provider.clone());

        Ok(Self {
            provider,
            tracer,
            endpoint,
        })
    }

    /// 实际使用的导出地址
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 供 tracing-opentelemetry layer 使用的 tracer
    pub fn tracer(&self) -> Tracer {
        self.tracer.clone()
    }

    /// 刷新并关闭导出器
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.shutdown() {
            warn!(error = %e, "Failed to shut down trace exporter");
        }
    }
}

/// 解析 collector 地址
///
/// `JAEGER_ENDPOINT` 优先并原样使用；否则把 agent 的 `host:port`
/// 当作 OTLP/HTTP 接收端
pub fn resolve_endpoint(agent_endpoint: &str, collector_endpoint: &str) -> AppResult<String> {
    let collector = collector_endpoint.trim();
    if !collector.is_empty() {
        return Ok(collector.to_string());
    }

    let agent = agent_endpoint.trim();
    if !agent.is_empty() {
        return Ok(format!("http://{}/v1/traces", agent));
    }

    Err(AppError::external_service(
        "missing endpoint for Jaeger exporter",
    ))
}

/// agent 地址是否指向 Jaeger 的 UDP agent 端口（6831/6832）
///
/// 导出走 OTLP/HTTP，这两个端口收不到任何 span
pub fn uses_udp_agent_port(config: &TracingConfig) -> bool {
    if !config.collector_endpoint.trim().is_empty() {
        return false;
    }

    config
        .agent_endpoint
        .trim()
        .rsplit_once(':')
        .is_some_and(|(_, port)| matches!(port, "6831" | "6832"))
}

/// 根据采样率选择采样器
pub fn sampler_for_ratio(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 || ratio.is_nan() {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

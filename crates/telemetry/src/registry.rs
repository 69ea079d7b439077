//! Metrics 注册表
//!
//! 进程内 Prometheus 记录器。注册表作为普通值传递，不安装为全局 recorder

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hello_errors::{AppError, AppResult};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Prometheus 文本格式的 Content-Type
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// HTTP 延迟直方图分桶（秒）
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metrics 注册表
#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// 创建注册表并写入进程级指标
    pub fn new(service_name: &str) -> AppResult<Self> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                LATENCY_BUCKETS,
            )
            .map_err(|e| AppError::internal(format!("Invalid histogram buckets: {}", e)))?
            .build_recorder();
        let handle = recorder.handle();

        let registry = Self {
            recorder: Arc::new(recorder),
            handle,
        };
        registry.register_process_metrics(service_name);
        Ok(registry)
    }

    /// 在本注册表上下文中执行 metrics 宏
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(self.recorder.as_ref(), f)
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// 记录 HTTP 请求
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];

        self.record(|| {
            counter!("http_requests_total", &labels).increment(1);
            histogram!("http_request_duration_seconds", &labels).record(duration_secs);
        });
    }

    /// 业务计数器加一
    pub fn increment(&self, name: &'static str) {
        self.record(|| counter!(name).increment(1));
    }

    fn register_process_metrics(&self, service_name: &str) {
        let started_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let labels = [("service", service_name.to_string())];

        self.record(|| {
            gauge!("service_info", &labels).set(1.0);
            gauge!("process_start_time_seconds").set(started_at);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 取出同时匹配名称和全部标签片段的样本值
    fn sample(output: &str, name: &str, labels: &[&str]) -> Option<f64> {
        output
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter(|line| line.starts_with(&format!("{}{{", name)) || line.starts_with(&format!("{} ", name)))
            .find(|line| labels.iter().all(|l| line.contains(l)))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|v| v.parse().ok())
    }

    #[test]
    fn test_render_is_never_empty() {
        let registry = MetricsRegistry::new("test-service").unwrap();
        let output = registry.render();

        assert_eq!(sample(&output, "service_info", &["service=\"test-service\""]), Some(1.0));
        assert!(sample(&output, "process_start_time_seconds", &[]).unwrap() > 0.0);
    }

    #[test]
    fn test_http_request_counter() {
        let registry = MetricsRegistry::new("test-service").unwrap();
        registry.record_http_request("GET", "/hello/{first_name}", 200, 0.003);
        registry.record_http_request("GET", "/hello/{first_name}", 200, 0.004);

        let output = registry.render();
        let labels = ["method=\"GET\"", "path=\"/hello/{first_name}\"", "status=\"200\""];
        assert_eq!(sample(&output, "http_requests_total", &labels), Some(2.0));
        assert!(output.contains("http_request_duration_seconds_bucket"));
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = MetricsRegistry::new("a").unwrap();
        let b = MetricsRegistry::new("b").unwrap();
        a.increment("people_created_total");

        assert_eq!(sample(&a.render(), "people_created_total", &[]), Some(1.0));
        assert_eq!(sample(&b.render(), "people_created_total", &[]), None);
    }
}

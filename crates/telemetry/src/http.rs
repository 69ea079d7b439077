//! HTTP 埋点
//!
//! axum 中间件与 `/metrics` 处理器

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::MetricsRegistry;

/// 请求计数与延迟中间件
///
/// 按路由模板打标签；没有匹配任何路由的请求（fallback）记为 `unmatched`
pub async fn track_http_metrics(
    State(metrics): State<MetricsRegistry>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics.record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// Metrics 端点处理器
pub async fn metrics_handler(State(metrics): State<MetricsRegistry>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, crate::PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, body::to_bytes, http::Request, middleware, routing::get};
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "OK"
    }

    fn app(metrics: MetricsRegistry) -> Router {
        Router::new()
            .route("/items/{id}", get(handler))
            .route("/metrics", get(metrics_handler))
            .layer(middleware::from_fn_with_state(
                metrics.clone(),
                track_http_metrics,
            ))
            .with_state(metrics)
    }

    #[tokio::test]
    async fn test_requests_are_counted_by_route_template() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let app = app(metrics.clone());

        for id in ["1", "2"] {
            let req = Request::builder()
                .uri(format!("/items/{}", id))
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let output = metrics.render();
        assert!(output.contains("path=\"/items/{id}\""));
        assert!(!output.contains("path=\"/items/1\""));
    }

    #[tokio::test]
    async fn test_fallback_is_counted_as_unmatched() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let app = Router::new()
            .route("/items/{id}", get(handler))
            .layer(middleware::from_fn_with_state(
                metrics.clone(),
                track_http_metrics,
            ));

        let req = Request::builder()
            .uri("/missing/path")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let output = metrics.render();
        assert!(output.contains("path=\"unmatched\""));
        assert!(output.contains("status=\"404\""));
        assert!(!output.contains("/missing/path"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();

        let response = app(metrics).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            crate::PROMETHEUS_CONTENT_TYPE
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!body.is_empty());
    }
}

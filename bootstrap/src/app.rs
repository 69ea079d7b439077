//! HTTP 应用组装
//!
//! 在业务路由之上挂载 `/metrics`、请求 metrics 与请求级 tracing span

use axum::{Router, middleware, routing::get};
use hello_telemetry::{MetricsRegistry, metrics_handler, track_http_metrics};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// 组装完整的 HTTP 应用
///
/// handler panic 在最内层转成 500，请求 metrics 记录到的是最终状态码。
/// 未匹配的路径同样计入 metrics
pub fn build_app(routes: Router, metrics: MetricsRegistry) -> Router {
    routes
        .route("/metrics", get(metrics_handler).with_state(metrics.clone()))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(metrics, track_http_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "OK"
    }

    async fn panicking_handler() -> &'static str {
        panic!("handler exploded")
    }

    async fn render(app: Router) -> String {
        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_metrics_route_is_mounted() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let app = build_app(Router::new().route("/ping", get(handler)), metrics);

        let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("path=\"/ping\""));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let app = build_app(Router::new().route("/ping", get(handler)), metrics);

        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let text = render(app).await;
        assert!(text.contains("path=\"unmatched\""));
        assert!(text.contains("status=\"404\""));
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_server_error() {
        let metrics = MetricsRegistry::new("test").unwrap();
        let app = build_app(
            Router::new().route("/boom", get(panicking_handler)),
            metrics,
        );

        let req = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // 之后的请求照常处理
        let text = render(app).await;
        assert!(text.contains("path=\"/boom\""));
        assert!(text.contains("status=\"500\""));
    }
}

//! 健康检查端点

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use hello_adapter_mysql::check_connection;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `/health` 与 `/ready` 路由
pub fn health_routes(pool: MySqlPool) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .with_state(pool)
}

/// Liveness 端点处理器
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness 端点处理器
async fn ready_handler(State(pool): State<MySqlPool>) -> impl IntoResponse {
    match check_connection(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

//! 请求处理器

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use hello_errors::{AppError, AppResult};
use serde::Deserialize;
use tracing::{error, warn};

use super::routes::AppState;
use crate::domain::Person;

/// `POST /people` 请求体
///
/// 字段缺失与空字符串一样按校验错误处理
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// 创建人员
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> AppResult<Json<Person>> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected create person request");
        AppError::validation(e.body_text())
    })?;

    state
        .people
        .create_person(
            request.first_name.unwrap_or_default(),
            request.last_name.unwrap_or_default(),
        )
        .await
        .map(Json)
        .inspect_err(|e| {
            if e.is_server_error() {
                error!(error = %e, "Failed to create person");
            }
        })
}

/// 按名问候
pub async fn hello(
    State(state): State<AppState>,
    Path(first_name): Path<String>,
) -> AppResult<String> {
    state.people.greet(&first_name).await.inspect_err(|e| {
        if e.is_server_error() {
            error!(error = %e, "Failed to look up person");
        }
    })
}

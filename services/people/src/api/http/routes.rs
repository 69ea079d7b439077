//! 路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{create_person, hello};
use crate::application::PeopleService;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub people: Arc<PeopleService>,
}

impl AppState {
    pub fn new(people: PeopleService) -> Self {
        Self {
            people: Arc::new(people),
        }
    }
}

/// 业务路由
pub fn people_routes(state: AppState) -> Router {
    Router::new()
        .route("/people", post(create_person))
        .route("/hello/{first_name}", get(hello))
        .with_state(state)
}

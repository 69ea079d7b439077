#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use hello_errors::{AppError, AppResult};
use hello_telemetry::MetricsRegistry;
use people::api::http::{AppState, people_routes};
use people::application::PeopleService;
use people::domain::{NewPerson, Person, PersonRepository};

/// 内存仓储
#[derive(Default)]
pub struct InMemoryPersonRepository {
    rows: Mutex<Vec<Person>>,
}

impl InMemoryPersonRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn create(&self, person: &NewPerson) -> AppResult<Person> {
        let mut rows = self.rows.lock().unwrap();
        let created = Person {
            id: rows.len() as u64 + 1,
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_first_name(&self, first_name: &str) -> AppResult<Option<Person>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.first_name == first_name).cloned())
    }

    async fn exists(&self, first_name: &str, last_name: &str) -> AppResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|p| p.first_name == first_name && p.last_name == last_name))
    }
}

/// 所有操作都失败的仓储
pub struct FailingPersonRepository;

#[async_trait]
impl PersonRepository for FailingPersonRepository {
    async fn create(&self, _person: &NewPerson) -> AppResult<Person> {
        Err(AppError::database("connection refused"))
    }

    async fn find_by_first_name(&self, _first_name: &str) -> AppResult<Option<Person>> {
        Err(AppError::database("connection refused"))
    }

    async fn exists(&self, _first_name: &str, _last_name: &str) -> AppResult<bool> {
        Err(AppError::database("connection refused"))
    }
}

/// 与生产一致的完整应用
pub fn test_app(repo: Arc<dyn PersonRepository>) -> (Router, MetricsRegistry) {
    let metrics = MetricsRegistry::new("people-test").unwrap();
    let service = PeopleService::new(repo, metrics.clone());
    let app = hello_bootstrap::build_app(people_routes(AppState::new(service)), metrics.clone());
    (app, metrics)
}

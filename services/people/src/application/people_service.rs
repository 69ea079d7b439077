//! 人员应用服务

use std::sync::Arc;

use hello_errors::{AppError, AppResult};
use hello_telemetry::MetricsRegistry;
use tracing::info;

use crate::domain::{NewPerson, Person, PersonRepository};

/// 人员应用服务
pub struct PeopleService {
    repo: Arc<dyn PersonRepository>,
    metrics: MetricsRegistry,
}

impl PeopleService {
    pub fn new(repo: Arc<dyn PersonRepository>, metrics: MetricsRegistry) -> Self {
        Self { repo, metrics }
    }

    /// 创建人员
    pub async fn create_person(&self, first_name: String, last_name: String) -> AppResult<Person> {
        let new_person = NewPerson::new(first_name, last_name)?;
        let person = self.repo.create(&new_person).await?;

        self.metrics.increment("people_created_total");
        info!(id = person.id, first_name = %person.first_name, "Person created");

        Ok(person)
    }

    /// 按名问候
    pub async fn greet(&self, first_name: &str) -> AppResult<String> {
        self.repo
            .find_by_first_name(first_name)
            .await?
            .map(|person| person.greeting())
            .ok_or_else(|| AppError::not_found(format!("person with first name {}", first_name)))
    }
}

//! MySQL 人员仓储实现

use async_trait::async_trait;
use hello_adapter_mysql::{MigrationResult, TableSchema, auto_migrate};
use hello_errors::{AppError, AppResult};
use sqlx::MySqlPool;
use tracing::Instrument;

use crate::domain::{NewPerson, Person, PersonRepository};
use crate::infrastructure::observability::db_span;

const TABLE: &str = "people";

/// `people` 表结构
pub fn person_schema() -> TableSchema {
    TableSchema::new(TABLE)
        .column("id", "BIGINT UNSIGNED NOT NULL AUTO_INCREMENT")
        .column("first_name", "VARCHAR(255) NOT NULL DEFAULT ''")
        .column("last_name", "VARCHAR(255) NOT NULL DEFAULT ''")
        .primary_key("id")
}

pub struct MySqlPersonRepository {
    pool: MySqlPool,
}

impl MySqlPersonRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 迁移 `people` 表
    pub async fn migrate(&self) -> AppResult<MigrationResult> {
        auto_migrate(&self.pool, &person_schema())
            .instrument(db_span("migrate", TABLE))
            .await
    }
}

#[derive(sqlx::FromRow)]
struct PersonRow {
    id: u64,
    first_name: String,
    last_name: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[async_trait]
impl PersonRepository for MySqlPersonRepository {
    async fn create(&self, person: &NewPerson) -> AppResult<Person> {
        let result = sqlx::query("INSERT INTO people (first_name, last_name) VALUES (?, ?)")
            .bind(&person.first_name)
            .bind(&person.last_name)
            .execute(&self.pool)
            .instrument(db_span("insert", TABLE))
            .await
            .map_err(|e| AppError::database(format!("Failed to create person: {}", e)))?;

        Ok(Person {
            id: result.last_insert_id(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
        })
    }

    async fn find_by_first_name(&self, first_name: &str) -> AppResult<Option<Person>> {
        sqlx::query_as::<_, PersonRow>(
            "SELECT id, first_name, last_name FROM people
             WHERE first_name = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(first_name)
        .fetch_optional(&self.pool)
        .instrument(db_span("select", TABLE))
        .await
        .map(|row| row.map(Into::into))
        .map_err(|e| AppError::database(format!("Failed to find person: {}", e)))
    }

    async fn exists(&self, first_name: &str, last_name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM people WHERE first_name = ? AND last_name = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .instrument(db_span("count", TABLE))
        .await
        .map_err(|e| AppError::database(format!("Failed to check person: {}", e)))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_schema_columns() {
        let schema = person_schema();
        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(schema.name, "people");
        assert_eq!(names, vec!["id", "first_name", "last_name"]);
        assert_eq!(schema.primary_key.as_deref(), Some("id"));
    }
}

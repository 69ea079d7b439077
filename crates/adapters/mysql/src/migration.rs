//! MySQL 结构迁移模块
//!
//! 按实体结构自动迁移：表不存在则创建，缺失的列补齐。只增不删

use hello_errors::{AppError, AppResult};
use sqlx::MySqlPool;
use tracing::info;

/// 列定义
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// 列名
    pub name: String,
    /// 类型与约束，如 `VARCHAR(255) NOT NULL`
    pub definition: String,
}

/// 表结构
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub primary_key: Option<String>,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            columns: Vec::new(),
        }
    }

    /// 添加列
    pub fn column(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            definition: definition.into(),
        });
        self
    }

    /// 设置主键
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// 建表 SQL
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("`{}` {}", c.name, c.definition))
            .collect();

        if let Some(pk) = &self.primary_key {
            parts.push(format!("PRIMARY KEY (`{}`)", pk));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS `{}` ({}) DEFAULT CHARSET=utf8mb4",
            self.name,
            parts.join(", ")
        )
    }

    /// 加列 SQL
    pub fn add_column_sql(&self, column: &ColumnDef) -> String {
        format!(
            "ALTER TABLE `{}` ADD COLUMN `{}` {}",
            self.name, column.name, column.definition
        )
    }

    /// 找出数据库中缺失的列（列名大小写不敏感）
    pub fn missing_columns(&self, existing: &[String]) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| !existing.iter().any(|e| e.eq_ignore_ascii_case(&c.name)))
            .collect()
    }
}

/// 迁移结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    /// 新增的列
    pub added_columns: Vec<String>,
}

impl MigrationResult {
    /// 新增列数量
    pub fn applied_count(&self) -> usize {
        self.added_columns.len()
    }
}

/// 自动迁移单张表
pub async fn auto_migrate(pool: &MySqlPool, schema: &TableSchema) -> AppResult<MigrationResult> {
    sqlx::query(&schema.create_table_sql())
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create table {}: {}", schema.name, e))
        })?;

    let existing: Vec<String> = sqlx::query_scalar::<_, String>(
        "SELECT CAST(COLUMN_NAME AS CHAR) FROM information_schema.COLUMNS
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?",
    )
    .bind(&schema.name)
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database(format!("Failed to inspect table {}: {}", schema.name, e)))?;

    let mut result = MigrationResult::default();
    for column in schema.missing_columns(&existing) {
        sqlx::query(&schema.add_column_sql(column))
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to add column {}.{}: {}",
                    schema.name, column.name, e
                ))
            })?;

        info!(table = %schema.name, column = %column.name, "Column added");
        result.added_columns.push(column.name.clone());
    }

    info!(
        table = %schema.name,
        added = result.applied_count(),
        "Schema migrated"
    );

    Ok(result)
}

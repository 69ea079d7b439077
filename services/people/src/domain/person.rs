//! 人员实体

use hello_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 人员
///
/// ID 由数据库自增分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    /// 问候语
    pub fn greeting(&self) -> String {
        format!("Hello {} {}", self.first_name, self.last_name)
    }
}

/// 待创建的人员
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
}

impl NewPerson {
    /// 创建并校验，名和姓都不能为空
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> AppResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();

        if first_name.trim().is_empty() {
            return Err(AppError::validation("firstName is required"));
        }
        if last_name.trim().is_empty() {
            return Err(AppError::validation("lastName is required"));
        }

        Ok(Self {
            first_name,
            last_name,
        })
    }
}

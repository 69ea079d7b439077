//! 人员 Repository trait

use async_trait::async_trait;
use hello_errors::AppResult;

use super::{NewPerson, Person};

#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// 插入新人员，返回带 ID 的实体
    async fn create(&self, person: &NewPerson) -> AppResult<Person>;

    /// 按名查找，多条时取 ID 最小的一条
    async fn find_by_first_name(&self, first_name: &str) -> AppResult<Option<Person>>;

    /// 检查同名同姓的人员是否存在
    async fn exists(&self, first_name: &str, last_name: &str) -> AppResult<bool>;
}

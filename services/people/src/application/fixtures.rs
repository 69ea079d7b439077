//! 启动示例数据

use hello_errors::AppResult;
use tracing::{debug, info};

use crate::domain::{NewPerson, PersonRepository};

/// 固定的示例人员（名, 姓）
pub const FIXTURES: &[(&str, &str)] = &[("John", "Doe"), ("Jane", "Doe")];

/// 写入示例数据
///
/// 已存在同名同姓的记录则跳过，可重复执行。返回本次新插入的条数
pub async fn seed_fixtures(repo: &dyn PersonRepository) -> AppResult<usize> {
    let mut inserted = 0;

    for (first_name, last_name) in FIXTURES {
        if repo.exists(first_name, last_name).await? {
            debug!(first_name, last_name, "Fixture already present");
            continue;
        }

        let person = repo.create(&NewPerson::new(*first_name, *last_name)?).await?;
        debug!(id = person.id, first_name, last_name, "Fixture inserted");
        inserted += 1;
    }

    info!(inserted, total = FIXTURES.len(), "Fixtures loaded");
    Ok(inserted)
}

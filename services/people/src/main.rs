//! 人员示例服务入口

use std::sync::Arc;

use hello_errors::AppError;
use people::api::http::{AppState, people_routes};
use people::application::{PeopleService, seed_fixtures};
use people::infrastructure::persistence::MySqlPersonRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    hello_bootstrap::run(|infra| async move {
        let repo = MySqlPersonRepository::new(infra.mysql_pool());

        // 迁移与示例数据，失败即终止启动
        repo.migrate().await?;
        seed_fixtures(&repo).await?;

        let service = PeopleService::new(Arc::new(repo), infra.metrics());
        Ok::<_, AppError>(people_routes(AppState::new(service)))
    })
    .await
}

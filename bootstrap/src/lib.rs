//! hello-bootstrap - 统一服务启动骨架
//!
//! 配置、可观测性、数据库与 HTTP 服务的启动顺序

mod app;
mod health;
mod infrastructure;
mod runtime;
mod starter;

pub use app::*;
pub use health::*;
pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;

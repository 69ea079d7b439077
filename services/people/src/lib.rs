//! people - 人员示例服务
//!
//! 创建人员、按名问候，启动时迁移表结构并写入示例数据

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

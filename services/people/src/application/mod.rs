//! 应用层

mod fixtures;
mod people_service;

pub use fixtures::*;
pub use people_service::*;

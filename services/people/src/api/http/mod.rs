//! HTTP 接口

mod handlers;
mod routes;

pub use handlers::*;
pub use routes::*;

//! hello-adapter-mysql - MySQL 适配器

mod connection;
mod dsn;
mod migration;

pub use connection::*;
pub use dsn::*;
pub use migration::*;

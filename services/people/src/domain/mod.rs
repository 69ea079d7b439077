//! 领域层

mod person;
mod repository;

pub use person::*;
pub use repository::*;

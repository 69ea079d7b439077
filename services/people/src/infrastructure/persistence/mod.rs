//! 持久化实现

mod mysql_person_repository;

pub use mysql_person_repository::*;

//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod manga_repo;

pub use database::*;
pub use manga_repo::*;

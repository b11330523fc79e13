//! SQLite Persistence - SQLite 数据库持久化实现

mod chapter_repo;
mod database;
mod novel_repo;
mod part_repo;

pub use chapter_repo::*;
pub use database::*;
pub use novel_repo::*;
pub use part_repo::*;

//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 小说聚合（正篇 / 番外章节引用列表）
//! - 标题、正文、章节类型、排序号等值对象

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::ChapterRefs;
pub use errors::NovelError;
pub use value_objects::{ChapterType, Content, Order, Title, DEFAULT_DESCRIPTION};

//! Domain Layer - 领域层
//!
//! 包含:
//! - Novel Context: 小说 / 章节 / 分段 (Part) 的值对象与聚合
//! - Ordering: 同级排序引擎（稠密、从 1 开始的 order 维护）
//! - Reading: 阅读视图的纯函数（字数统计）

pub mod novel;
pub mod ordering;

mod reading;

pub use reading::word_count;

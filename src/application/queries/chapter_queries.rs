//! Chapter Queries

use uuid::Uuid;

use crate::application::ports::Direction;

/// 获取章节查询
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: Uuid,
}

/// 列出小说的全部章节查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: Uuid,
}

/// 获取相邻章节查询（同一小说、同一类型）
#[derive(Debug, Clone)]
pub struct GetAdjacentChapter {
    pub chapter_id: Uuid,
    pub direction: Direction,
}

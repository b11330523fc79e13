//! Part Queries

use uuid::Uuid;

/// 获取分段查询
#[derive(Debug, Clone)]
pub struct GetPart {
    pub part_id: Uuid,
}

/// 列出章节的全部分段查询
#[derive(Debug, Clone)]
pub struct ListParts {
    pub chapter_id: Uuid,
}

/// 阅读视图查询
#[derive(Debug, Clone)]
pub struct GetPartReader {
    pub part_id: Uuid,
}

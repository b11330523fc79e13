//! Novel Queries

use uuid::Uuid;

/// 获取小说详情查询（展开章节与分段）
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub novel_id: Uuid,
}

/// 列出所有小说查询
#[derive(Debug, Clone)]
pub struct ListNovels;

//! Chapter Commands

use uuid::Uuid;

/// 创建章节命令
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub novel_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// "main" | "side"
    pub chapter_type: String,
    pub order: i64,
    pub has_parts: Option<bool>,
}

/// 更新章节命令（字段为 None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub chapter_type: Option<String>,
    pub order: Option<i64>,
    pub has_parts: Option<bool>,
}

/// 删除章节命令（级联删除分段）
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: Uuid,
}

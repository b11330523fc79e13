//! Novel Commands

use uuid::Uuid;

/// 创建小说命令
#[derive(Debug, Clone)]
pub struct CreateNovel {
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

/// 更新小说命令（字段为 None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateNovel {
    pub novel_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

/// 删除小说命令（级联删除章节与分段）
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub novel_id: Uuid,
}

//! Part Commands

use uuid::Uuid;

/// 创建分段命令
#[derive(Debug, Clone)]
pub struct CreatePart {
    pub chapter_id: Uuid,
    pub title: String,
    pub content: String,
    /// 为空时追加到章节末尾
    pub order: Option<i64>,
    pub cover_image: Option<String>,
}

/// 更新分段命令
///
/// title / content 必填；order 变化时触发同级重排
#[derive(Debug, Clone)]
pub struct UpdatePart {
    pub part_id: Uuid,
    pub title: String,
    pub content: String,
    pub order: Option<i64>,
    pub cover_image: Option<String>,
}

/// 删除分段命令（删除后压缩同级 order）
#[derive(Debug, Clone)]
pub struct DeletePart {
    pub part_id: Uuid,
}

/// 清理孤立分段命令（所属章节已不存在）
#[derive(Debug, Clone)]
pub struct CleanupOrphanedParts;

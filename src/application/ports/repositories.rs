//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::novel::{ChapterRefs, ChapterType};
use crate::domain::ordering::{OrderShift, Slot};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub chapter_refs: ChapterRefs,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 级联删除统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeStats {
    pub chapters: u64,
    pub parts: u64,
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存小说（不存在则插入，存在则更新）
    ///
    /// 更新时只写标题、简介、封面和更新时间；章节引用列表由章节仓储在其事务内维护
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找小说
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 获取所有小说（按创建时间倒序）
    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError>;

    /// 删除小说及其全部章节、分段（单事务）
    async fn delete(&self, id: Uuid) -> Result<CascadeStats, RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub chapter_type: ChapterType,
    pub order: u32,
    pub has_parts: bool,
    /// 分段排序版本号，每次分段变更 +1
    pub parts_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 相邻章节方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// 章节删除结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterRemoval {
    /// 一并删除的分段数
    pub parts: u64,
    /// 是否从所属小说的引用列表中移除（小说已不存在时为 false）
    pub detached: bool,
}

/// Chapter Repository Port
///
/// 写操作在同一事务内读取并改写所属小说的章节引用列表；
/// (novel, type, order) 冲突返回 `RepositoryError::Duplicate`
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 获取小说的所有章节（按 order 排序）
    async fn find_by_novel(&self, novel_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 按 (novel, type, order) 查找章节
    async fn find_by_position(
        &self,
        novel_id: Uuid,
        chapter_type: ChapterType,
        order: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 同一小说、同一类型中 order 最近的下一章 / 上一章
    async fn find_adjacent(
        &self,
        chapter: &ChapterRecord,
        direction: Direction,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 创建章节并追加到小说的引用列表，小说不存在时返回 NotFound
    async fn create(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 更新章节；类型与 `previous_type` 不同时把引用移到另一列表
    async fn update(
        &self,
        chapter: &ChapterRecord,
        previous_type: ChapterType,
    ) -> Result<(), RepositoryError>;

    /// 删除章节及其分段，并从小说引用列表中移除
    async fn delete(&self, chapter_id: Uuid) -> Result<ChapterRemoval, RepositoryError>;
}

// ============================================================================
// Part Repository
// ============================================================================

/// 分段实体（用于持久化）
#[derive(Debug, Clone)]
pub struct PartRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub content: String,
    pub cover_image: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节内全部分段的快照
#[derive(Debug, Clone)]
pub struct PartSiblings {
    pub chapter_id: Uuid,
    /// 读取时章节的 parts_version
    pub version: i64,
    /// 按 order 排序
    pub parts: Vec<PartRecord>,
}

impl PartSiblings {
    /// 转换为排序引擎的输入
    pub fn slots(&self) -> Vec<Slot<Uuid>> {
        self.parts
            .iter()
            .map(|part| Slot::new(part.id, part.order))
            .collect()
    }

    pub fn get(&self, part_id: Uuid) -> Option<&PartRecord> {
        self.parts.iter().find(|part| part.id == part_id)
    }
}

/// 一次分段变更（插入 / 更新 / 删除 + 同级重排）
///
/// 仓储在一个事务内应用：先比较并递增章节的 parts_version，
/// 版本不一致时返回 `RepositoryError::Conflict` 且不写入任何内容
#[derive(Debug, Clone)]
pub struct PartChangeSet {
    pub chapter_id: Uuid,
    pub expected_version: i64,
    pub upsert: Option<PartRecord>,
    pub remove: Option<Uuid>,
    pub shifts: Vec<OrderShift<Uuid>>,
}

impl PartChangeSet {
    pub fn new(siblings: &PartSiblings) -> Self {
        Self {
            chapter_id: siblings.chapter_id,
            expected_version: siblings.version,
            upsert: None,
            remove: None,
            shifts: Vec::new(),
        }
    }

    pub fn upsert(mut self, part: PartRecord) -> Self {
        self.upsert = Some(part);
        self
    }

    pub fn remove(mut self, part_id: Uuid) -> Self {
        self.remove = Some(part_id);
        self
    }

    pub fn shifts(mut self, shifts: Vec<OrderShift<Uuid>>) -> Self {
        self.shifts = shifts;
        self
    }
}

/// Part Repository Port
#[async_trait]
pub trait PartRepositoryPort: Send + Sync {
    /// 根据 ID 查找分段
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PartRecord>, RepositoryError>;

    /// 获取章节的所有分段（按 order 排序）
    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Vec<PartRecord>, RepositoryError>;

    /// 读取章节分段快照；章节不存在时返回 None
    async fn find_siblings(
        &self,
        chapter_id: Uuid,
    ) -> Result<Option<PartSiblings>, RepositoryError>;

    /// 原子地应用一次分段变更
    async fn apply(&self, changes: &PartChangeSet) -> Result<(), RepositoryError>;

    /// 查找 chapter_id 指向不存在章节的分段
    async fn find_orphans(&self) -> Result<Vec<PartRecord>, RepositoryError>;

    /// 批量删除分段，返回删除数量
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, RepositoryError>;
}

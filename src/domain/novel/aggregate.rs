//! Novel Context - Aggregate
//!
//! 小说持有的章节引用列表（与章节表中的 novel_id / type 冗余）

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ChapterType;

/// 小说的章节引用
///
/// 不变量:
/// - 一个章节 ID 最多出现在一个列表中，且只出现一次
/// - 章节所在列表与其 type 一致（main -> chapters, side -> side_stories）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRefs {
    chapters: Vec<Uuid>,
    side_stories: Vec<Uuid>,
}

impl ChapterRefs {
    pub fn new(chapters: Vec<Uuid>, side_stories: Vec<Uuid>) -> Self {
        Self {
            chapters,
            side_stories,
        }
    }

    /// 将章节挂到对应类型的列表末尾
    pub fn attach(&mut self, chapter_id: Uuid, chapter_type: ChapterType) {
        self.detach(chapter_id);
        self.list_mut(chapter_type).push(chapter_id);
    }

    /// 从两个列表中移除章节，返回是否存在
    pub fn detach(&mut self, chapter_id: Uuid) -> bool {
        let before = self.chapters.len() + self.side_stories.len();
        self.chapters.retain(|id| *id != chapter_id);
        self.side_stories.retain(|id| *id != chapter_id);
        before != self.chapters.len() + self.side_stories.len()
    }

    /// 章节类型变更时移动引用；类型未变则保持原位置
    pub fn retype(&mut self, chapter_id: Uuid, chapter_type: ChapterType) {
        if !self.list(chapter_type).contains(&chapter_id) {
            self.attach(chapter_id, chapter_type);
        }
    }

    pub fn list(&self, chapter_type: ChapterType) -> &[Uuid] {
        match chapter_type {
            ChapterType::Main => &self.chapters,
            ChapterType::Side => &self.side_stories,
        }
    }

    fn list_mut(&mut self, chapter_type: ChapterType) -> &mut Vec<Uuid> {
        match chapter_type {
            ChapterType::Main => &mut self.chapters,
            ChapterType::Side => &mut self.side_stories,
        }
    }

    pub fn chapters(&self) -> &[Uuid] {
        &self.chapters
    }

    pub fn side_stories(&self) -> &[Uuid] {
        &self.side_stories
    }
}

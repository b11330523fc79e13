//! Novel Query Handlers

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::chapter_handlers::{expand_chapters, ChapterWithParts};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, NovelRecord, NovelRepositoryPort, PartRepositoryPort,
};
use crate::application::queries::{GetNovel, ListNovels};

// ============================================================================
// Response DTOs
// ============================================================================

/// 小说详情：正篇与番外展开为章节对象，按 order 排序
#[derive(Debug, Clone)]
pub struct NovelDetail {
    pub novel: NovelRecord,
    pub chapters: Vec<ChapterWithParts>,
    pub side_stories: Vec<ChapterWithParts>,
}

/// 按引用列表挑出章节并按 order 排序，悬空引用直接跳过
fn resolve_refs(ids: &[Uuid], by_id: &mut HashMap<Uuid, ChapterRecord>) -> Vec<ChapterRecord> {
    let mut resolved: Vec<ChapterRecord> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    resolved.sort_by_key(|chapter| chapter.order);
    resolved
}

// ============================================================================
// Handlers
// ============================================================================

/// GetNovel Handler
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        part_repo: Arc<dyn PartRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            part_repo,
        }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelDetail, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        let mut by_id: HashMap<Uuid, ChapterRecord> = self
            .chapter_repo
            .find_by_novel(novel.id)
            .await?
            .into_iter()
            .map(|chapter| (chapter.id, chapter))
            .collect();

        let chapters = resolve_refs(novel.chapter_refs.chapters(), &mut by_id);
        let side_stories = resolve_refs(novel.chapter_refs.side_stories(), &mut by_id);

        if !by_id.is_empty() {
            tracing::warn!(
                novel_id = %novel.id,
                unreferenced = by_id.len(),
                "Novel has chapters missing from its reference lists"
            );
        }

        Ok(NovelDetail {
            chapters: expand_chapters(&self.part_repo, chapters).await?,
            side_stories: expand_chapters(&self.part_repo, side_stories).await?,
            novel,
        })
    }
}

/// ListNovels Handler
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, _query: ListNovels) -> Result<Vec<NovelRecord>, ApplicationError> {
        Ok(self.novel_repo.find_all().await?)
    }
}

//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, Direction, PartRecord, PartRepositoryPort,
};
use crate::application::queries::{GetAdjacentChapter, GetChapter, ListChapters};

// ============================================================================
// Response DTOs
// ============================================================================

/// 章节及其分段（`has_parts` 为 false 时不加载分段）
#[derive(Debug, Clone)]
pub struct ChapterWithParts {
    pub chapter: ChapterRecord,
    pub parts: Option<Vec<PartRecord>>,
}

/// 为每个章节加载分段
pub(crate) async fn expand_chapters(
    part_repo: &Arc<dyn PartRepositoryPort>,
    chapters: Vec<ChapterRecord>,
) -> Result<Vec<ChapterWithParts>, ApplicationError> {
    let mut expanded = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        let parts = if chapter.has_parts {
            Some(part_repo.find_by_chapter(chapter.id).await?)
        } else {
            None
        };
        expanded.push(ChapterWithParts { chapter, parts });
    }
    Ok(expanded)
}

// ============================================================================
// Handlers
// ============================================================================

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        part_repo: Arc<dyn PartRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            part_repo,
        }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterWithParts, ApplicationError> {
        let chapter = self
            .chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        let mut expanded = expand_chapters(&self.part_repo, vec![chapter]).await?;
        expanded
            .pop()
            .ok_or_else(|| ApplicationError::internal("Chapter expansion returned nothing"))
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        part_repo: Arc<dyn PartRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            part_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListChapters,
    ) -> Result<Vec<ChapterWithParts>, ApplicationError> {
        let chapters = self.chapter_repo.find_by_novel(query.novel_id).await?;
        expand_chapters(&self.part_repo, chapters).await
    }
}

/// GetAdjacentChapter Handler
pub struct GetAdjacentChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetAdjacentChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(
        &self,
        query: GetAdjacentChapter,
    ) -> Result<ChapterRecord, ApplicationError> {
        let current = self
            .chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        self.chapter_repo
            .find_adjacent(&current, query.direction)
            .await?
            .ok_or_else(|| {
                ApplicationError::NoNeighbor(
                    match query.direction {
                        Direction::Next => "No next chapter found",
                        Direction::Previous => "No previous chapter found",
                    }
                    .to_string(),
                )
            })
    }
}

//! Part Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, Direction, PartRecord, PartRepositoryPort,
};
use crate::application::queries::{GetPart, GetPartReader, ListParts};
use crate::domain::word_count;

// ============================================================================
// Response DTOs
// ============================================================================

/// 阅读视图
#[derive(Debug, Clone)]
pub struct PartReaderView {
    pub part: PartRecord,
    pub chapter: ChapterRecord,
    pub previous_part: Option<PartRecord>,
    pub next_part: Option<PartRecord>,
    pub previous_chapter: Option<ChapterRecord>,
    pub next_chapter: Option<ChapterRecord>,
    pub word_count: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetPart Handler
pub struct GetPartHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl GetPartHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, query: GetPart) -> Result<PartRecord, ApplicationError> {
        self.part_repo
            .find_by_id(query.part_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Part", query.part_id))
    }
}

/// ListParts Handler
pub struct ListPartsHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl ListPartsHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, query: ListParts) -> Result<Vec<PartRecord>, ApplicationError> {
        Ok(self.part_repo.find_by_chapter(query.chapter_id).await?)
    }
}

/// GetPartReader Handler
pub struct GetPartReaderHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl GetPartReaderHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        part_repo: Arc<dyn PartRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            part_repo,
        }
    }

    pub async fn handle(&self, query: GetPartReader) -> Result<PartReaderView, ApplicationError> {
        let part = self
            .part_repo
            .find_by_id(query.part_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Part", query.part_id))?;

        let chapter = self
            .chapter_repo
            .find_by_id(part.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", part.chapter_id))?;

        let siblings = self.part_repo.find_by_chapter(chapter.id).await?;
        let previous_part = siblings
            .iter()
            .filter(|p| p.order < part.order)
            .max_by_key(|p| p.order)
            .cloned();
        let next_part = siblings
            .iter()
            .filter(|p| p.order > part.order)
            .min_by_key(|p| p.order)
            .cloned();

        let previous_chapter = self
            .chapter_repo
            .find_adjacent(&chapter, Direction::Previous)
            .await?;
        let next_chapter = self
            .chapter_repo
            .find_adjacent(&chapter, Direction::Next)
            .await?;

        Ok(PartReaderView {
            word_count: word_count(&part.content),
            part,
            chapter,
            previous_part,
            next_part,
            previous_chapter,
            next_chapter,
        })
    }
}

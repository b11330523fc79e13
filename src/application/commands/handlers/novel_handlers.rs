//! Novel Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateNovel, DeleteNovel, UpdateNovel};
use crate::application::error::ApplicationError;
use crate::application::ports::{CascadeStats, NovelRecord, NovelRepositoryPort};
use crate::domain::novel::{ChapterRefs, Title, DEFAULT_DESCRIPTION};

/// 简介为空时使用默认值
fn normalize_description(description: Option<String>) -> String {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
}

// ============================================================================
// CreateNovel
// ============================================================================

/// CreateNovel Handler
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<NovelRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let now = Utc::now();

        let novel = NovelRecord {
            id: Uuid::new_v4(),
            title: title.into_inner(),
            description: normalize_description(command.description),
            cover_image: command.cover_image.unwrap_or_default().trim().to_string(),
            chapter_refs: ChapterRefs::default(),
            created_at: now,
            updated_at: now,
        };

        self.novel_repo.save(&novel).await?;

        tracing::info!(
            novel_id = %novel.id,
            title = %novel.title,
            has_cover = !novel.cover_image.is_empty(),
            "Novel created"
        );

        Ok(novel)
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler
pub struct UpdateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<NovelRecord, ApplicationError> {
        let mut novel = self
            .novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        if let Some(title) = command.title {
            novel.title = Title::new(title)?.into_inner();
        }
        if command.description.is_some() {
            novel.description = normalize_description(command.description);
        }
        if let Some(cover_image) = command.cover_image {
            novel.cover_image = cover_image.trim().to_string();
        }
        novel.updated_at = Utc::now();

        self.novel_repo.save(&novel).await?;

        tracing::info!(novel_id = %novel.id, title = %novel.title, "Novel updated");

        Ok(novel)
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl DeleteNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<CascadeStats, ApplicationError> {
        let novel_id = command.novel_id;

        // 检查小说是否存在
        let novel = self
            .novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        let stats = self.novel_repo.delete(novel_id).await?;

        tracing::info!(
            novel_id = %novel_id,
            title = %novel.title,
            chapters = stats.chapters,
            parts = stats.parts,
            "Novel deleted"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None), DEFAULT_DESCRIPTION);
        assert_eq!(normalize_description(Some("   ".into())), DEFAULT_DESCRIPTION);
        assert_eq!(normalize_description(Some(" A tale ".into())), "A tale");
    }
}

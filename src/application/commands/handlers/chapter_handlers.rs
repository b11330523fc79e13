//! Chapter Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateChapter, DeleteChapter, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort, NovelRepositoryPort};
use crate::domain::novel::{ChapterType, Order, Title};

/// (novel, type, order) 已被其他章节占用时的错误
fn duplicate_position(chapter_type: ChapterType, order: u32) -> ApplicationError {
    ApplicationError::validation(format!(
        "A {} chapter with order {} already exists",
        chapter_type, order
    ))
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
pub struct CreateChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let chapter_type = ChapterType::parse(&command.chapter_type)?;
        let order = Order::new(command.order)?.get();

        let novel = self
            .novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        if self
            .chapter_repo
            .find_by_position(novel.id, chapter_type, order)
            .await?
            .is_some()
        {
            return Err(duplicate_position(chapter_type, order));
        }

        let now = Utc::now();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id: novel.id,
            title: title.into_inner(),
            description: command.description.unwrap_or_default().trim().to_string(),
            cover_image: command.cover_image.unwrap_or_default().trim().to_string(),
            chapter_type,
            order,
            has_parts: command.has_parts.unwrap_or(true),
            parts_version: 0,
            created_at: now,
            updated_at: now,
        };

        // 并发创建同一位置时由仓储的唯一约束兜底
        self.chapter_repo.create(&chapter).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            novel_id = %novel.id,
            chapter_type = %chapter_type,
            order = order,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
///
/// type 或 order 变化时重新校验 (novel, type, order) 唯一性，
/// type 变化时由仓储同步移动小说中的章节引用
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let mut chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let previous_type = chapter.chapter_type;
        let previous_order = chapter.order;

        if let Some(title) = command.title {
            chapter.title = Title::new(title)?.into_inner();
        }
        if let Some(description) = command.description {
            chapter.description = description.trim().to_string();
        }
        if let Some(cover_image) = command.cover_image {
            chapter.cover_image = cover_image.trim().to_string();
        }
        if let Some(chapter_type) = command.chapter_type {
            chapter.chapter_type = ChapterType::parse(&chapter_type)?;
        }
        if let Some(order) = command.order {
            chapter.order = Order::new(order)?.get();
        }
        if let Some(has_parts) = command.has_parts {
            chapter.has_parts = has_parts;
        }

        let moved = chapter.chapter_type != previous_type || chapter.order != previous_order;
        if moved {
            let occupant = self
                .chapter_repo
                .find_by_position(chapter.novel_id, chapter.chapter_type, chapter.order)
                .await?;
            if occupant.is_some_and(|other| other.id != chapter.id) {
                return Err(duplicate_position(chapter.chapter_type, chapter.order));
            }
        }

        chapter.updated_at = Utc::now();

        self.chapter_repo.update(&chapter, previous_type).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            chapter_type = %chapter.chapter_type,
            order = chapter.order,
            moved = moved,
            "Chapter updated"
        );

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
///
/// 删除分段、章节，并从小说引用中移除（单事务）
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<u64, ApplicationError> {
        let chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let removal = self.chapter_repo.delete(chapter.id).await?;
        if !removal.detached {
            tracing::warn!(
                chapter_id = %chapter.id,
                novel_id = %chapter.novel_id,
                "Deleted chapter whose novel no longer exists"
            );
        }

        tracing::info!(
            chapter_id = %chapter.id,
            novel_id = %chapter.novel_id,
            parts = removal.parts,
            "Chapter deleted"
        );

        Ok(removal.parts)
    }
}

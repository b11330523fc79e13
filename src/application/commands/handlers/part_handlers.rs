//! Part Command Handlers
//!
//! 分段的增删改都经过排序引擎：先读取章节快照，计算 order 变更，
//! 再由仓储在一个事务内（带 parts_version 比较）整体写入

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CleanupOrphanedParts, CreatePart, DeletePart, UpdatePart};
use crate::application::error::ApplicationError;
use crate::application::ports::{PartChangeSet, PartRecord, PartRepositoryPort, PartSiblings};
use crate::domain::novel::{Content, Order, Title};
use crate::domain::ordering::{is_dense, plan_insert, plan_move, plan_removal};

/// 读取章节快照，章节不存在返回 NotFound
async fn load_siblings(
    part_repo: &Arc<dyn PartRepositoryPort>,
    chapter_id: Uuid,
) -> Result<PartSiblings, ApplicationError> {
    let siblings = part_repo
        .find_siblings(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

    if !is_dense(&siblings.slots()) {
        tracing::warn!(
            chapter_id = %chapter_id,
            parts = siblings.parts.len(),
            "Part orders in chapter are not a dense sequence"
        );
    }

    Ok(siblings)
}

// ============================================================================
// CreatePart
// ============================================================================

/// CreatePart Handler
pub struct CreatePartHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl CreatePartHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, command: CreatePart) -> Result<PartRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let content = Content::new(command.content)?;
        let requested = command.order.map(Order::new).transpose()?;

        let siblings = load_siblings(&self.part_repo, command.chapter_id).await?;
        let plan = plan_insert(&siblings.slots(), requested.map(|o| o.get()))?;

        let now = Utc::now();
        let part = PartRecord {
            id: Uuid::new_v4(),
            chapter_id: command.chapter_id,
            title: title.into_inner(),
            content: content.into_inner(),
            cover_image: command.cover_image.unwrap_or_default().trim().to_string(),
            order: plan.order,
            created_at: now,
            updated_at: now,
        };

        let shifted = plan.shifts.len();
        let changes = PartChangeSet::new(&siblings)
            .upsert(part.clone())
            .shifts(plan.shifts);
        self.part_repo.apply(&changes).await?;

        tracing::info!(
            part_id = %part.id,
            chapter_id = %part.chapter_id,
            order = part.order,
            shifted = shifted,
            "Part created"
        );

        Ok(part)
    }
}

// ============================================================================
// UpdatePart
// ============================================================================

/// UpdatePart Handler
pub struct UpdatePartHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl UpdatePartHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, command: UpdatePart) -> Result<PartRecord, ApplicationError> {
        let existing = self
            .part_repo
            .find_by_id(command.part_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Part", command.part_id))?;

        let title = Title::new(command.title)?;
        let content = Content::new(command.content)?;
        let target = command.order.map(Order::new).transpose()?.map(|o| o.get());

        let siblings = load_siblings(&self.part_repo, existing.chapter_id).await?;
        // 以快照中的 order 为准，避免读取之间的漂移
        let current = siblings
            .get(existing.id)
            .map(|p| p.order)
            .unwrap_or(existing.order);

        let mut part = existing;
        let mut shifts = Vec::new();
        if let Some(target) = target.filter(|t| *t != current) {
            shifts = plan_move(&siblings.slots(), part.id, target)?;
            shifts.retain(|s| s.key != part.id);
            part.order = target;
        }

        part.title = title.into_inner();
        part.content = content.into_inner();
        if let Some(cover_image) = command.cover_image {
            part.cover_image = cover_image.trim().to_string();
        }
        part.updated_at = Utc::now();

        let shifted = shifts.len();
        let changes = PartChangeSet::new(&siblings)
            .upsert(part.clone())
            .shifts(shifts);
        self.part_repo.apply(&changes).await?;

        tracing::info!(
            part_id = %part.id,
            chapter_id = %part.chapter_id,
            from = current,
            to = part.order,
            shifted = shifted,
            "Part updated"
        );

        Ok(part)
    }
}

// ============================================================================
// DeletePart
// ============================================================================

/// DeletePart Handler
pub struct DeletePartHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl DeletePartHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, command: DeletePart) -> Result<(), ApplicationError> {
        let part = self
            .part_repo
            .find_by_id(command.part_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Part", command.part_id))?;

        let Some(siblings) = self.part_repo.find_siblings(part.chapter_id).await? else {
            // 孤立分段：没有同级需要压缩
            self.part_repo.delete_by_ids(&[part.id]).await?;
            tracing::info!(part_id = %part.id, "Orphaned part deleted");
            return Ok(());
        };

        let shifts = plan_removal(&siblings.slots(), part.id)?;
        let shifted = shifts.len();
        let changes = PartChangeSet::new(&siblings).remove(part.id).shifts(shifts);
        self.part_repo.apply(&changes).await?;

        tracing::info!(
            part_id = %part.id,
            chapter_id = %part.chapter_id,
            order = part.order,
            shifted = shifted,
            "Part deleted"
        );

        Ok(())
    }
}

// ============================================================================
// CleanupOrphanedParts
// ============================================================================

/// CleanupOrphanedParts Handler
pub struct CleanupOrphanedPartsHandler {
    part_repo: Arc<dyn PartRepositoryPort>,
}

impl CleanupOrphanedPartsHandler {
    pub fn new(part_repo: Arc<dyn PartRepositoryPort>) -> Self {
        Self { part_repo }
    }

    pub async fn handle(&self, _command: CleanupOrphanedParts) -> Result<u64, ApplicationError> {
        let orphans = self.part_repo.find_orphans().await?;
        if orphans.is_empty() {
            tracing::info!("No orphaned parts found");
            return Ok(0);
        }

        for part in &orphans {
            tracing::debug!(
                part_id = %part.id,
                chapter_id = %part.chapter_id,
                title = %part.title,
                "Deleting orphaned part"
            );
        }

        let ids: Vec<Uuid> = orphans.iter().map(|p| p.id).collect();
        let deleted = self.part_repo.delete_by_ids(&ids).await?;

        tracing::info!(deleted = deleted, "Orphaned parts cleaned up");

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::{CreateChapterHandler, CreateNovelHandler};
    use crate::application::commands::{CreateChapter, CreateNovel};
    use crate::application::ports::{ChapterRepositoryPort, NovelRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, DbPool, SqliteChapterRepository,
        SqliteNovelRepository, SqlitePartRepository,
    };

    struct Fixture {
        pool: DbPool,
        part_repo: Arc<dyn PartRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        chapter_id: Uuid,
    }

    impl Fixture {
        async fn new() -> Self {
            let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
            run_migrations(&pool).await.unwrap();

            let novel_repo: Arc<dyn NovelRepositoryPort> =
                Arc::new(SqliteNovelRepository::new(pool.clone()));
            let chapter_repo: Arc<dyn ChapterRepositoryPort> =
                Arc::new(SqliteChapterRepository::new(pool.clone()));
            let part_repo: Arc<dyn PartRepositoryPort> =
                Arc::new(SqlitePartRepository::new(pool.clone()));

            let novel = CreateNovelHandler::new(novel_repo.clone())
                .handle(CreateNovel {
                    title: "The Long Tide".into(),
                    description: None,
                    cover_image: None,
                })
                .await
                .unwrap();

            let chapter = CreateChapterHandler::new(novel_repo, chapter_repo.clone())
                .handle(CreateChapter {
                    novel_id: novel.id,
                    title: "Low Water".into(),
                    description: None,
                    cover_image: None,
                    chapter_type: "main".into(),
                    order: 1,
                    has_parts: None,
                })
                .await
                .unwrap();

            Self {
                pool,
                part_repo,
                chapter_repo,
                chapter_id: chapter.id,
            }
        }

        async fn create(&self, title: &str, order: Option<i64>) -> Result<PartRecord, ApplicationError> {
            CreatePartHandler::new(self.part_repo.clone())
                .handle(CreatePart {
                    chapter_id: self.chapter_id,
                    title: title.into(),
                    content: format!("<p>{}</p>", title),
                    order,
                    cover_image: None,
                })
                .await
        }

        async fn move_to(&self, part: &PartRecord, order: i64) -> Result<PartRecord, ApplicationError> {
            UpdatePartHandler::new(self.part_repo.clone())
                .handle(UpdatePart {
                    part_id: part.id,
                    title: part.title.clone(),
                    content: part.content.clone(),
                    order: Some(order),
                    cover_image: None,
                })
                .await
        }

        async fn delete(&self, part: &PartRecord) -> Result<(), ApplicationError> {
            DeletePartHandler::new(self.part_repo.clone())
                .handle(DeletePart { part_id: part.id })
                .await
        }

        async fn layout(&self) -> Vec<(String, u32)> {
            self.part_repo
                .find_by_chapter(self.chapter_id)
                .await
                .unwrap()
                .into_iter()
                .map(|p| (p.title, p.order))
                .collect()
        }
    }

    fn expected(items: &[(&str, u32)]) -> Vec<(String, u32)> {
        items.iter().map(|(t, o)| (t.to_string(), *o)).collect()
    }

    #[tokio::test]
    async fn test_create_appends() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();
        fx.create("B", None).await.unwrap();

        assert_eq!(fx.layout().await, expected(&[("A", 1), ("B", 2)]));
    }

    #[tokio::test]
    async fn test_create_at_occupied_slot_shifts_later_parts() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();
        fx.create("B", None).await.unwrap();
        fx.create("X", Some(1)).await.unwrap();

        assert_eq!(
            fx.layout().await,
            expected(&[("X", 1), ("A", 2), ("B", 3)])
        );
    }

    #[tokio::test]
    async fn test_create_out_of_range_rejected() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();

        let err = fx.create("Z", Some(5)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(fx.layout().await, expected(&[("A", 1)]));
    }

    #[tokio::test]
    async fn test_create_in_missing_chapter() {
        let fx = Fixture::new().await;
        let err = CreatePartHandler::new(fx.part_repo.clone())
            .handle(CreatePart {
                chapter_id: Uuid::new_v4(),
                title: "Lost".into(),
                content: "text".into(),
                order: None,
                cover_image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Chapter", .. }));
    }

    #[tokio::test]
    async fn test_move_down_example() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();
        let b = fx.create("B", None).await.unwrap();
        fx.create("C", None).await.unwrap();

        let moved = fx.move_to(&b, 3).await.unwrap();
        assert_eq!(moved.order, 3);
        assert_eq!(
            fx.layout().await,
            expected(&[("A", 1), ("C", 2), ("B", 3)])
        );
    }

    #[tokio::test]
    async fn test_move_up_in_five_part_chapter() {
        let fx = Fixture::new().await;
        let mut parts = Vec::new();
        for title in ["P1", "P2", "P3", "P4", "P5"] {
            parts.push(fx.create(title, None).await.unwrap());
        }

        fx.move_to(&parts[2], 1).await.unwrap();

        assert_eq!(
            fx.layout().await,
            expected(&[("P3", 1), ("P1", 2), ("P2", 3), ("P4", 4), ("P5", 5)])
        );
    }

    #[tokio::test]
    async fn test_move_beyond_count_rejected() {
        let fx = Fixture::new().await;
        let a = fx.create("A", None).await.unwrap();
        fx.create("B", None).await.unwrap();

        let err = fx.move_to(&a, 3).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(fx.layout().await, expected(&[("A", 1), ("B", 2)]));
    }

    #[tokio::test]
    async fn test_update_without_order_change_keeps_siblings() {
        let fx = Fixture::new().await;
        let a = fx.create("A", None).await.unwrap();
        fx.create("B", None).await.unwrap();

        let updated = UpdatePartHandler::new(fx.part_repo.clone())
            .handle(UpdatePart {
                part_id: a.id,
                title: "A, revised".into(),
                content: "<p>new</p>".into(),
                order: None,
                cover_image: Some("/uploads/a.png".into()),
            })
            .await
            .unwrap();

        assert_eq!(updated.order, 1);
        assert_eq!(updated.cover_image, "/uploads/a.png");
        assert_eq!(
            fx.layout().await,
            expected(&[("A, revised", 1), ("B", 2)])
        );
    }

    #[tokio::test]
    async fn test_update_requires_title_and_content() {
        let fx = Fixture::new().await;
        let a = fx.create("A", None).await.unwrap();

        let err = UpdatePartHandler::new(fx.part_repo.clone())
            .handle(UpdatePart {
                part_id: a.id,
                title: "A".into(),
                content: "   ".into(),
                order: None,
                cover_image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete_compacts_later_parts() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();
        let b = fx.create("B", None).await.unwrap();
        fx.create("C", None).await.unwrap();
        fx.create("D", None).await.unwrap();

        fx.delete(&b).await.unwrap();

        assert_eq!(
            fx.layout().await,
            expected(&[("A", 1), ("C", 2), ("D", 3)])
        );
    }

    #[tokio::test]
    async fn test_mixed_operations_stay_dense() {
        let fx = Fixture::new().await;
        let mut parts = Vec::new();
        for title in ["A", "B", "C", "D"] {
            parts.push(fx.create(title, None).await.unwrap());
        }
        fx.move_to(&parts[0], 4).await.unwrap();
        fx.delete(&parts[2]).await.unwrap();
        fx.create("E", Some(2)).await.unwrap();
        fx.move_to(&parts[3], 1).await.unwrap();

        let orders: Vec<u32> = fx.layout().await.into_iter().map(|(_, o)| o).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_parts_of_deleted_chapter() {
        let fx = Fixture::new().await;
        fx.create("A", None).await.unwrap();
        fx.create("B", None).await.unwrap();

        // 直接删除章节行，模拟历史遗留的孤立分段
        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(fx.chapter_id.to_string())
            .execute(&fx.pool)
            .await
            .unwrap();

        let handler = CleanupOrphanedPartsHandler::new(fx.part_repo.clone());
        assert_eq!(handler.handle(CleanupOrphanedParts).await.unwrap(), 2);
        assert!(fx.part_repo.find_orphans().await.unwrap().is_empty());
        assert_eq!(handler.handle(CleanupOrphanedParts).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_orphaned_part_directly() {
        let fx = Fixture::new().await;
        let a = fx.create("A", None).await.unwrap();
        assert!(fx.chapter_repo.find_by_id(fx.chapter_id).await.unwrap().is_some());

        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(fx.chapter_id.to_string())
            .execute(&fx.pool)
            .await
            .unwrap();

        fx.delete(&a).await.unwrap();
        assert!(fx.part_repo.find_by_id(a.id).await.unwrap().is_none());
    }
}

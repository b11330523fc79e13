//! SQLite Chapter Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::novel_repo::update_chapter_refs;
use super::{
    db_error, format_time, is_unique_violation, parse_order, parse_time, parse_uuid, DbPool,
};
use crate::application::ports::{
    ChapterRecord, ChapterRemoval, ChapterRepositoryPort, Direction, RepositoryError,
};
use crate::domain::novel::ChapterType;

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    title: String,
    description: String,
    cover_image: String,
    chapter_type: String,
    sort_order: i64,
    has_parts: bool,
    parts_version: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            novel_id: parse_uuid(&row.novel_id)?,
            title: row.title,
            description: row.description,
            cover_image: row.cover_image,
            chapter_type: ChapterType::parse(&row.chapter_type)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            order: parse_order(row.sort_order)?,
            has_parts: row.has_parts,
            parts_version: row.parts_version,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const CHAPTER_COLUMNS: &str = "id, novel_id, title, description, cover_image, chapter_type, \
     sort_order, has_parts, parts_version, created_at, updated_at";

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_novel(&self, novel_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE novel_id = ? ORDER BY sort_order, created_at",
            CHAPTER_COLUMNS
        ))
        .bind(novel_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn find_by_position(
        &self,
        novel_id: Uuid,
        chapter_type: ChapterType,
        order: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE novel_id = ? AND chapter_type = ? AND sort_order = ? LIMIT 1",
            CHAPTER_COLUMNS
        ))
        .bind(novel_id.to_string())
        .bind(chapter_type.as_str())
        .bind(i64::from(order))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_adjacent(
        &self,
        chapter: &ChapterRecord,
        direction: Direction,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let (comparison, sort) = match direction {
            Direction::Next => (">", "ASC"),
            Direction::Previous => ("<", "DESC"),
        };

        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE novel_id = ? AND chapter_type = ? AND sort_order {} ? ORDER BY sort_order {} LIMIT 1",
            CHAPTER_COLUMNS, comparison, sort
        ))
        .bind(chapter.novel_id.to_string())
        .bind(chapter.chapter_type.as_str())
        .bind(i64::from(chapter.order))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn create(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 先写章节行：事务取得写锁，并由唯一索引拦截位置冲突
        sqlx::query(
            r#"
            INSERT INTO chapters (id, novel_id, title, description, cover_image, chapter_type,
                                  sort_order, has_parts, parts_version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.novel_id.to_string())
        .bind(&chapter.title)
        .bind(&chapter.description)
        .bind(&chapter.cover_image)
        .bind(chapter.chapter_type.as_str())
        .bind(i64::from(chapter.order))
        .bind(chapter.has_parts)
        .bind(chapter.parts_version)
        .bind(format_time(&chapter.created_at))
        .bind(format_time(&chapter.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, chapter))?;

        let attached = update_chapter_refs(
            &mut *tx,
            chapter.novel_id,
            &chapter.created_at,
            |refs| refs.attach(chapter.id, chapter.chapter_type),
        )
        .await?;

        if !attached {
            return Err(RepositoryError::NotFound {
                resource_type: "Novel",
                id: chapter.novel_id,
            });
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn update(
        &self,
        chapter: &ChapterRecord,
        previous_type: ChapterType,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // parts_version 由分段仓储维护，这里不覆盖
        let result = sqlx::query(
            r#"
            UPDATE chapters
            SET title = ?, description = ?, cover_image = ?, chapter_type = ?,
                sort_order = ?, has_parts = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&chapter.title)
        .bind(&chapter.description)
        .bind(&chapter.cover_image)
        .bind(chapter.chapter_type.as_str())
        .bind(i64::from(chapter.order))
        .bind(chapter.has_parts)
        .bind(format_time(&chapter.updated_at))
        .bind(chapter.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, chapter))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                resource_type: "Chapter",
                id: chapter.id,
            });
        }

        if chapter.chapter_type != previous_type {
            let found = update_chapter_refs(
                &mut *tx,
                chapter.novel_id,
                &chapter.updated_at,
                |refs| refs.retype(chapter.id, chapter.chapter_type),
            )
            .await?;
            if !found {
                tracing::warn!(
                    chapter_id = %chapter.id,
                    novel_id = %chapter.novel_id,
                    "Retyped chapter whose novel no longer exists"
                );
            }
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn delete(&self, chapter_id: Uuid) -> Result<ChapterRemoval, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let parts = sqlx::query("DELETE FROM parts WHERE chapter_id = ?")
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let novel_id: Option<(String,)> =
            sqlx::query_as("DELETE FROM chapters WHERE id = ? RETURNING novel_id")
                .bind(chapter_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;

        let Some((novel_id,)) = novel_id else {
            return Err(RepositoryError::NotFound {
                resource_type: "Chapter",
                id: chapter_id,
            });
        };

        let detached = update_chapter_refs(&mut *tx, parse_uuid(&novel_id)?, &Utc::now(), |refs| {
            refs.detach(chapter_id);
        })
        .await?;

        tx.commit().await.map_err(db_error)?;

        Ok(ChapterRemoval { parts, detached })
    }
}

/// 唯一索引冲突映射为 Duplicate
fn write_error(e: sqlx::Error, chapter: &ChapterRecord) -> RepositoryError {
    if is_unique_violation(&e) {
        RepositoryError::Duplicate(format!(
            "A {} chapter with order {} already exists",
            chapter.chapter_type, chapter.order
        ))
    } else {
        db_error(e)
    }
}

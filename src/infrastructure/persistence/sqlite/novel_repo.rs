//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::{db_error, format_time, parse_time, parse_uuid, DbPool};
use crate::application::ports::{CascadeStats, NovelRecord, NovelRepositoryPort, RepositoryError};
use crate::domain::novel::ChapterRefs;

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: String,
    title: String,
    description: String,
    cover_image: String,
    chapter_ids: String,
    side_story_ids: String,
    created_at: String,
    updated_at: String,
}

fn parse_ids(json: &str) -> Result<Vec<Uuid>, RepositoryError> {
    serde_json::from_str(json).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn encode_ids(ids: &[Uuid]) -> Result<String, RepositoryError> {
    serde_json::to_string(ids).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        Ok(NovelRecord {
            id: parse_uuid(&row.id)?,
            title: row.title,
            description: row.description,
            cover_image: row.cover_image,
            chapter_refs: ChapterRefs::new(
                parse_ids(&row.chapter_ids)?,
                parse_ids(&row.side_story_ids)?,
            ),
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const NOVEL_COLUMNS: &str =
    "id, title, description, cover_image, chapter_ids, side_story_ids, created_at, updated_at";

/// 在调用方事务内读取、修改并写回小说的章节引用列表
///
/// 调用方须先在同一事务内执行过写语句：此时事务已持有写锁，
/// 读到的是最新提交的引用列表。小说不存在时返回 `false`
pub(super) async fn update_chapter_refs<F>(
    conn: &mut SqliteConnection,
    novel_id: Uuid,
    updated_at: &DateTime<Utc>,
    change: F,
) -> Result<bool, RepositoryError>
where
    F: FnOnce(&mut ChapterRefs) + Send,
{
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT chapter_ids, side_story_ids FROM novels WHERE id = ?")
            .bind(novel_id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_error)?;

    let Some((chapter_ids, side_story_ids)) = row else {
        return Ok(false);
    };

    let mut refs = ChapterRefs::new(parse_ids(&chapter_ids)?, parse_ids(&side_story_ids)?);
    change(&mut refs);

    sqlx::query(
        "UPDATE novels SET chapter_ids = ?, side_story_ids = ?, updated_at = ? WHERE id = ?",
    )
    .bind(encode_ids(refs.chapters())?)
    .bind(encode_ids(refs.side_stories())?)
    .bind(format_time(updated_at))
    .bind(novel_id.to_string())
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    Ok(true)
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novels (id, title, description, cover_image, chapter_ids, side_story_ids, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                cover_image = excluded.cover_image,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(novel.id.to_string())
        .bind(&novel.title)
        .bind(&novel.description)
        .bind(&novel.cover_image)
        .bind(encode_ids(novel.chapter_refs.chapters())?)
        .bind(encode_ids(novel.chapter_refs.side_stories())?)
        .bind(format_time(&novel.created_at))
        .bind(format_time(&novel.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> =
            sqlx::query_as(&format!("SELECT {} FROM novels WHERE id = ?", NOVEL_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError> {
        let rows: Vec<NovelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM novels ORDER BY created_at DESC",
            NOVEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(NovelRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<CascadeStats, RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 删除章节下的分段
        let parts = sqlx::query(
            "DELETE FROM parts WHERE chapter_id IN (SELECT id FROM chapters WHERE novel_id = ?)",
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .rows_affected();

        // 删除章节
        let chapters = sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        // 删除 novel
        let deleted = sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                resource_type: "Novel",
                id,
            });
        }

        tx.commit().await.map_err(db_error)?;

        Ok(CascadeStats { chapters, parts })
    }
}

//! SQLite Part Repository
//!
//! 分段变更以章节的 parts_version 做乐观并发控制：
//! 每次 `apply` 先比较并递增版本号，再在同一事务内写入所有 order 变更

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, format_time, parse_order, parse_time, parse_uuid, DbPool};
use crate::application::ports::{
    PartChangeSet, PartRecord, PartRepositoryPort, PartSiblings, RepositoryError,
};

/// SQLite Part Repository
pub struct SqlitePartRepository {
    pool: DbPool,
}

impl SqlitePartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PartRow {
    id: String,
    chapter_id: String,
    title: String,
    content: String,
    cover_image: String,
    sort_order: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PartRow> for PartRecord {
    type Error = RepositoryError;

    fn try_from(row: PartRow) -> Result<Self, Self::Error> {
        Ok(PartRecord {
            id: parse_uuid(&row.id)?,
            chapter_id: parse_uuid(&row.chapter_id)?,
            title: row.title,
            content: row.content,
            cover_image: row.cover_image,
            order: parse_order(row.sort_order)?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const PART_COLUMNS: &str =
    "id, chapter_id, title, content, cover_image, sort_order, created_at, updated_at";

#[async_trait]
impl PartRepositoryPort for SqlitePartRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PartRecord>, RepositoryError> {
        let row: Option<PartRow> =
            sqlx::query_as(&format!("SELECT {} FROM parts WHERE id = ?", PART_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(PartRecord::try_from).transpose()
    }

    async fn find_by_chapter(&self, chapter_id: Uuid) -> Result<Vec<PartRecord>, RepositoryError> {
        let rows: Vec<PartRow> = sqlx::query_as(&format!(
            "SELECT {} FROM parts WHERE chapter_id = ? ORDER BY sort_order, created_at",
            PART_COLUMNS
        ))
        .bind(chapter_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(PartRecord::try_from).collect()
    }

    async fn find_siblings(
        &self,
        chapter_id: Uuid,
    ) -> Result<Option<PartSiblings>, RepositoryError> {
        // 版本号与分段列表在同一读事务内读取，保证快照一致
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let version: Option<(i64,)> =
            sqlx::query_as("SELECT parts_version FROM chapters WHERE id = ?")
                .bind(chapter_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;

        let Some((version,)) = version else {
            return Ok(None);
        };

        let rows: Vec<PartRow> = sqlx::query_as(&format!(
            "SELECT {} FROM parts WHERE chapter_id = ? ORDER BY sort_order, created_at",
            PART_COLUMNS
        ))
        .bind(chapter_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        let parts = rows
            .into_iter()
            .map(PartRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(PartSiblings {
            chapter_id,
            version,
            parts,
        }))
    }

    async fn apply(&self, changes: &PartChangeSet) -> Result<(), RepositoryError> {
        let chapter_id = changes.chapter_id.to_string();
        let now = format_time(&Utc::now());

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 比较并递增版本号；不匹配说明快照之后有其他写入
        let claimed = sqlx::query(
            "UPDATE chapters SET parts_version = parts_version + 1 WHERE id = ? AND parts_version = ?",
        )
        .bind(&chapter_id)
        .bind(changes.expected_version)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .rows_affected();

        if claimed == 0 {
            tracing::warn!(
                chapter_id = %changes.chapter_id,
                expected_version = changes.expected_version,
                "Part ordering changed concurrently"
            );
            return Err(RepositoryError::Conflict(
                "Chapter parts were modified concurrently, please retry".to_string(),
            ));
        }

        if let Some(part_id) = changes.remove {
            sqlx::query("DELETE FROM parts WHERE id = ? AND chapter_id = ?")
                .bind(part_id.to_string())
                .bind(&chapter_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        for shift in &changes.shifts {
            sqlx::query(
                "UPDATE parts SET sort_order = ?, updated_at = ? WHERE id = ? AND chapter_id = ?",
            )
            .bind(i64::from(shift.to))
            .bind(&now)
            .bind(shift.key.to_string())
            .bind(&chapter_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        if let Some(part) = &changes.upsert {
            sqlx::query(
                r#"
                INSERT INTO parts (id, chapter_id, title, content, cover_image, sort_order, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    content = excluded.content,
                    cover_image = excluded.cover_image,
                    sort_order = excluded.sort_order,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(part.id.to_string())
            .bind(&chapter_id)
            .bind(&part.title)
            .bind(&part.content)
            .bind(&part.cover_image)
            .bind(i64::from(part.order))
            .bind(format_time(&part.created_at))
            .bind(format_time(&part.updated_at))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(
            chapter_id = %changes.chapter_id,
            version = changes.expected_version + 1,
            shifts = changes.shifts.len(),
            "Part change set applied"
        );

        Ok(())
    }

    async fn find_orphans(&self) -> Result<Vec<PartRecord>, RepositoryError> {
        let rows: Vec<PartRow> = sqlx::query_as(&format!(
            "SELECT {} FROM parts WHERE chapter_id NOT IN (SELECT id FROM chapters) ORDER BY created_at",
            PART_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(PartRecord::try_from).collect()
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        // 构建 IN 子句的占位符
        let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
        let query = format!(
            "DELETE FROM parts WHERE id IN ({})",
            placeholders.join(", ")
        );

        let mut sql_query = sqlx::query(&query);
        for id in ids {
            sql_query = sql_query.bind(id.to_string());
        }

        let result = sql_query.execute(&self.pool).await.map_err(db_error)?;

        Ok(result.rows_affected())
    }
}

//! Data Transfer Objects
//!
//! 请求体与响应体，JSON 字段统一为 camelCase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    ChapterRecord, ChapterWithParts, NovelDetail, NovelRecord, PartReaderView, PartRecord,
};
use crate::domain::novel::ChapterType;

// ============================================================================
// 通用响应
// ============================================================================

/// 仅含提示信息的响应（删除等）
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Novel DTOs
// ============================================================================

/// 缺失的必填字符串按空串处理，交给领域值对象给出具体的校验信息
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNovelRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNovelRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub chapters: Vec<Uuid>,
    pub side_stories: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NovelRecord> for NovelResponse {
    fn from(record: NovelRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            cover_image: record.cover_image,
            chapters: record.chapter_refs.chapters().to_vec(),
            side_stories: record.chapter_refs.side_stories().to_vec(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// 小说详情：章节引用展开为章节对象
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub chapters: Vec<ChapterResponse>,
    pub side_stories: Vec<ChapterResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NovelDetail> for NovelDetailResponse {
    fn from(detail: NovelDetail) -> Self {
        let novel = detail.novel;
        Self {
            id: novel.id,
            title: novel.title,
            description: novel.description,
            cover_image: novel.cover_image,
            chapters: detail.chapters.into_iter().map(Into::into).collect(),
            side_stories: detail.side_stories.into_iter().map(Into::into).collect(),
            created_at: novel.created_at,
            updated_at: novel.updated_at,
        }
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub novel_id: Uuid,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(rename = "type")]
    pub chapter_type: Option<String>,
    pub order: Option<i64>,
    pub has_parts: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChapterRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(rename = "type")]
    pub chapter_type: Option<String>,
    pub order: Option<i64>,
    pub has_parts: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    #[serde(rename = "type")]
    pub chapter_type: ChapterType,
    pub order: u32,
    pub has_parts: bool,
    /// 仅在列表 / 详情中展开，且章节 `hasParts` 为 true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<PartResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            title: record.title,
            description: record.description,
            cover_image: record.cover_image,
            chapter_type: record.chapter_type,
            order: record.order,
            has_parts: record.has_parts,
            parts: None,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<ChapterWithParts> for ChapterResponse {
    fn from(expanded: ChapterWithParts) -> Self {
        let mut response = ChapterResponse::from(expanded.chapter);
        response.parts = expanded
            .parts
            .map(|parts| parts.into_iter().map(Into::into).collect());
        response
    }
}

/// 导航用的章节摘要
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterLink {
    pub id: Uuid,
    pub title: String,
    pub order: u32,
}

impl From<ChapterRecord> for ChapterLink {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            order: record.order,
        }
    }
}

// ============================================================================
// Part DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartRequest {
    pub chapter_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub order: Option<i64>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub order: Option<i64>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResponse {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    pub content: String,
    pub cover_image: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PartRecord> for PartResponse {
    fn from(record: PartRecord) -> Self {
        Self {
            id: record.id,
            chapter_id: record.chapter_id,
            title: record.title,
            content: record.content,
            cover_image: record.cover_image,
            order: record.order,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// 导航用的分段摘要
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartLink {
    pub id: Uuid,
    pub title: String,
    pub order: u32,
}

impl From<PartRecord> for PartLink {
    fn from(record: PartRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            order: record.order,
        }
    }
}

/// 阅读视图
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartReaderResponse {
    pub part: PartResponse,
    pub chapter: ChapterResponse,
    pub previous_part: Option<PartLink>,
    pub next_part: Option<PartLink>,
    pub previous_chapter: Option<ChapterLink>,
    pub next_chapter: Option<ChapterLink>,
    pub word_count: usize,
}

impl From<PartReaderView> for PartReaderResponse {
    fn from(view: PartReaderView) -> Self {
        Self {
            part: view.part.into(),
            chapter: view.chapter.into(),
            previous_part: view.previous_part.map(Into::into),
            next_part: view.next_part.map(Into::into),
            previous_chapter: view.previous_chapter.map(Into::into),
            next_chapter: view.next_chapter.map(Into::into),
            word_count: view.word_count,
        }
    }
}

// ============================================================================
// Upload / Maintenance DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub message: String,
    pub deleted_count: u64,
}

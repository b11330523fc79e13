//! Chapter HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateChapter, DeleteChapter, Direction, GetAdjacentChapter, GetChapter, ListChapters,
    UpdateChapter,
};
use crate::infrastructure::http::dto::{
    ChapterResponse, CreateChapterRequest, MessageResponse, UpdateChapterRequest,
};
use crate::infrastructure::http::error::{ApiError, ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 小说的全部章节（按 order 排序，含分段）
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ChapterResponse>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters { novel_id })
        .await?;
    Ok(Json(chapters.into_iter().map(Into::into).collect()))
}

pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let chapter = state
        .get_chapter_handler
        .handle(GetChapter { chapter_id })
        .await?;
    Ok(Json(chapter.into()))
}

pub async fn next_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ChapterResponse>, ApiError> {
    adjacent(&state, chapter_id, Direction::Next).await
}

pub async fn previous_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ChapterResponse>, ApiError> {
    adjacent(&state, chapter_id, Direction::Previous).await
}

async fn adjacent(
    state: &AppState,
    chapter_id: Uuid,
    direction: Direction,
) -> Result<Json<ChapterResponse>, ApiError> {
    let chapter = state
        .adjacent_chapter_handler
        .handle(GetAdjacentChapter {
            chapter_id,
            direction,
        })
        .await?;
    Ok(Json(chapter.into()))
}

pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateChapterRequest>,
) -> Result<(StatusCode, Json<ChapterResponse>), ApiError> {
    let chapter_type = req
        .chapter_type
        .ok_or_else(|| ApiError::BadRequest("Type is required".to_string()))?;
    let order = req
        .order
        .ok_or_else(|| ApiError::BadRequest("Order is required".to_string()))?;

    let chapter = state
        .create_chapter_handler
        .handle(CreateChapter {
            novel_id: req.novel_id,
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
            chapter_type,
            order,
            has_parts: req.has_parts,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(chapter.into())))
}

pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateChapterRequest>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            chapter_id,
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
            chapter_type: req.chapter_type,
            order: req.order,
            has_parts: req.has_parts,
        })
        .await?;

    Ok(Json(chapter.into()))
}

/// 删除章节及其分段
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .delete_chapter_handler
        .handle(DeleteChapter { chapter_id })
        .await?;

    Ok(Json(MessageResponse::new(
        "Chapter and its parts deleted successfully",
    )))
}

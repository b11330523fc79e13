//! Novel HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CreateNovel, DeleteNovel, GetNovel, ListNovels, UpdateNovel};
use crate::infrastructure::http::dto::{
    CreateNovelRequest, MessageResponse, NovelDetailResponse, NovelResponse, UpdateNovelRequest,
};
use crate::infrastructure::http::error::{ApiError, ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 列出所有小说（最新在前）
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NovelResponse>>, ApiError> {
    let novels = state.list_novels_handler.handle(ListNovels).await?;
    Ok(Json(novels.into_iter().map(NovelResponse::from).collect()))
}

/// 获取小说详情（展开章节与分段）
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<Uuid>,
) -> Result<Json<NovelDetailResponse>, ApiError> {
    let detail = state.get_novel_handler.handle(GetNovel { novel_id }).await?;
    Ok(Json(detail.into()))
}

pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateNovelRequest>,
) -> Result<(StatusCode, Json<NovelResponse>), ApiError> {
    let novel = state
        .create_novel_handler
        .handle(CreateNovel {
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(novel.into())))
}

pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateNovelRequest>,
) -> Result<Json<NovelResponse>, ApiError> {
    let novel = state
        .update_novel_handler
        .handle(UpdateNovel {
            novel_id,
            title: req.title,
            description: req.description,
            cover_image: req.cover_image,
        })
        .await?;

    Ok(Json(novel.into()))
}

/// 删除小说及其全部章节和分段
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    ApiPath(novel_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .delete_novel_handler
        .handle(DeleteNovel { novel_id })
        .await?;

    Ok(Json(MessageResponse::new(
        "Novel and all its chapters deleted successfully",
    )))
}

//! Part HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CreatePart, DeletePart, GetPart, GetPartReader, ListParts, UpdatePart};
use crate::infrastructure::http::dto::{
    CreatePartRequest, MessageResponse, PartReaderResponse, PartResponse, UpdatePartRequest,
};
use crate::infrastructure::http::error::{ApiError, ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 章节的全部分段（按 order 排序）
pub async fn list_parts(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<Vec<PartResponse>>, ApiError> {
    let parts = state
        .list_parts_handler
        .handle(ListParts { chapter_id })
        .await?;
    Ok(Json(parts.into_iter().map(Into::into).collect()))
}

pub async fn get_part(
    State(state): State<Arc<AppState>>,
    ApiPath(part_id): ApiPath<Uuid>,
) -> Result<Json<PartResponse>, ApiError> {
    let part = state.get_part_handler.handle(GetPart { part_id }).await?;
    Ok(Json(part.into()))
}

/// 阅读视图：分段、所属章节、前后导航与字数
pub async fn get_part_reader(
    State(state): State<Arc<AppState>>,
    ApiPath(part_id): ApiPath<Uuid>,
) -> Result<Json<PartReaderResponse>, ApiError> {
    let view = state
        .part_reader_handler
        .handle(GetPartReader { part_id })
        .await?;
    Ok(Json(view.into()))
}

pub async fn create_part(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePartRequest>,
) -> Result<(StatusCode, Json<PartResponse>), ApiError> {
    let part = state
        .create_part_handler
        .handle(CreatePart {
            chapter_id: req.chapter_id,
            title: req.title,
            content: req.content,
            order: req.order,
            cover_image: req.cover_image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(part.into())))
}

/// 更新分段；order 变化时同级分段随之移位
pub async fn update_part(
    State(state): State<Arc<AppState>>,
    ApiPath(part_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdatePartRequest>,
) -> Result<Json<PartResponse>, ApiError> {
    let part = state
        .update_part_handler
        .handle(UpdatePart {
            part_id,
            title: req.title,
            content: req.content,
            order: req.order,
            cover_image: req.cover_image,
        })
        .await?;

    Ok(Json(part.into()))
}

pub async fn delete_part(
    State(state): State<Arc<AppState>>,
    ApiPath(part_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .delete_part_handler
        .handle(DeletePart { part_id })
        .await?;

    Ok(Json(MessageResponse::new("Part deleted successfully")))
}

//! Upload HTTP Handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::UploadImage;
use crate::infrastructure::http::dto::ImageUploadResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传图片（multipart 字段名 `image`）
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        let stored = state
            .upload_image_handler
            .handle(UploadImage {
                file_name,
                data: data.to_vec(),
            })
            .await?;

        return Ok(Json(ImageUploadResponse {
            image_url: stored.url,
        }));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

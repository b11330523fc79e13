//! Maintenance HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::CleanupOrphanedParts;
use crate::infrastructure::http::dto::CleanupResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 删除所属章节已不存在的分段
pub async fn cleanup_orphaned_parts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let deleted_count = state
        .cleanup_orphans_handler
        .handle(CleanupOrphanedParts)
        .await?;

    Ok(Json(CleanupResponse {
        message: format!("Deleted {} orphaned parts", deleted_count),
        deleted_count,
    }))
}

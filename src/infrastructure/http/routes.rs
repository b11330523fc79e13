//! HTTP Routes
//!
//! API Endpoints（写操作需要管理员令牌）:
//! - /api/ping                                   GET
//! - /api/novels                                 GET, POST
//! - /api/novels/:id                             GET, PUT, DELETE
//! - /api/chapters                               POST
//! - /api/chapters/novel/:novel_id               GET   小说的全部章节
//! - /api/chapters/next/:id                      GET   同类型下一章
//! - /api/chapters/previous/:id                  GET   同类型上一章
//! - /api/chapters/:id                           GET, PUT, DELETE
//! - /api/parts                                  POST
//! - /api/parts/chapter/:chapter_id              GET   章节的全部分段
//! - /api/parts/:id                              GET, PUT, DELETE
//! - /api/parts/:id/reader                       GET   阅读视图
//! - /api/upload/image                           POST  multipart
//! - /api/maintenance/orphaned-parts/cleanup     POST
//! - /uploads/*                                  GET   已上传图片

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::require_admin;
use super::state::AppState;

/// 创建所有 API 路由
pub fn create_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes(state))
}

/// API 路由
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novels", novel_routes())
        .nest("/chapters", chapter_routes())
        .nest("/parts", part_routes())
        .route("/upload/image", post(handlers::upload_image))
        .route(
            "/maintenance/orphaned-parts/cleanup",
            post(handlers::cleanup_orphaned_parts),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_novels).post(handlers::create_novel))
        .route(
            "/:id",
            get(handlers::get_novel)
                .put(handlers::update_novel)
                .delete(handlers::delete_novel),
        )
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_chapter))
        .route("/novel/:novel_id", get(handlers::list_chapters))
        .route("/next/:id", get(handlers::next_chapter))
        .route("/previous/:id", get(handlers::previous_chapter))
        .route(
            "/:id",
            get(handlers::get_chapter)
                .put(handlers::update_chapter)
                .delete(handlers::delete_chapter),
        )
}

/// Part 路由
fn part_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_part))
        .route("/chapter/:chapter_id", get(handlers::list_parts))
        .route("/:id/reader", get(handlers::get_part_reader))
        .route(
            "/:id",
            get(handlers::get_part)
                .put(handlers::update_part)
                .delete(handlers::delete_part),
        )
}

//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CleanupOrphanedPartsHandler, CreateChapterHandler, CreateNovelHandler, CreatePartHandler,
    DeleteChapterHandler, DeleteNovelHandler, DeletePartHandler, UpdateChapterHandler,
    UpdateNovelHandler, UpdatePartHandler, UploadImageHandler,
    // Query handlers
    GetAdjacentChapterHandler, GetChapterHandler, GetNovelHandler, GetPartHandler,
    GetPartReaderHandler, ListChaptersHandler, ListNovelsHandler, ListPartsHandler,
    // Ports
    ChapterRepositoryPort, ImageStoragePort, NovelRepositoryPort, PartRepositoryPort,
};
use crate::infrastructure::auth::TokenService;

/// 应用状态
pub struct AppState {
    // ========== Auth ==========
    pub token_service: Arc<TokenService>,

    // ========== Command Handlers ==========
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub create_part_handler: CreatePartHandler,
    pub update_part_handler: UpdatePartHandler,
    pub delete_part_handler: DeletePartHandler,
    pub cleanup_orphans_handler: CleanupOrphanedPartsHandler,
    pub upload_image_handler: UploadImageHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub adjacent_chapter_handler: GetAdjacentChapterHandler,
    pub get_part_handler: GetPartHandler,
    pub list_parts_handler: ListPartsHandler,
    pub part_reader_handler: GetPartReaderHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        part_repo: Arc<dyn PartRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            token_service,

            // Command handlers
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(novel_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(chapter_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(chapter_repo.clone()),
            create_part_handler: CreatePartHandler::new(part_repo.clone()),
            update_part_handler: UpdatePartHandler::new(part_repo.clone()),
            delete_part_handler: DeletePartHandler::new(part_repo.clone()),
            cleanup_orphans_handler: CleanupOrphanedPartsHandler::new(part_repo.clone()),
            upload_image_handler: UploadImageHandler::new(image_storage),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                part_repo.clone(),
            ),
            list_novels_handler: ListNovelsHandler::new(novel_repo),
            get_chapter_handler: GetChapterHandler::new(
                chapter_repo.clone(),
                part_repo.clone(),
            ),
            list_chapters_handler: ListChaptersHandler::new(
                chapter_repo.clone(),
                part_repo.clone(),
            ),
            adjacent_chapter_handler: GetAdjacentChapterHandler::new(chapter_repo.clone()),
            get_part_handler: GetPartHandler::new(part_repo.clone()),
            list_parts_handler: ListPartsHandler::new(part_repo.clone()),
            part_reader_handler: GetPartReaderHandler::new(chapter_repo, part_repo),
        }
    }
}

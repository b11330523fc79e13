//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ImageStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Novel commands
    CreateNovel,
    DeleteNovel,
    UpdateNovel,
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    UpdateChapter,
    // Part commands
    CleanupOrphanedParts,
    CreatePart,
    DeletePart,
    UpdatePart,
    // Image commands
    UploadImage,
    // Handlers
    handlers::{
        CleanupOrphanedPartsHandler, CreateChapterHandler, CreateNovelHandler, CreatePartHandler,
        DeleteChapterHandler, DeleteNovelHandler, DeletePartHandler, UpdateChapterHandler,
        UpdateNovelHandler, UpdatePartHandler, UploadImageHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Repositories
    CascadeStats,
    ChapterRecord,
    ChapterRemoval,
    ChapterRepositoryPort,
    Direction,
    NovelRecord,
    NovelRepositoryPort,
    PartChangeSet,
    PartRecord,
    PartRepositoryPort,
    PartSiblings,
    RepositoryError,
    // Image storage
    ImageStorageError,
    ImageStoragePort,
    StoredImage,
};

pub use queries::{
    // Novel queries
    GetNovel,
    ListNovels,
    // Chapter queries
    GetAdjacentChapter,
    GetChapter,
    ListChapters,
    // Part queries
    GetPart,
    GetPartReader,
    ListParts,
    // Handlers
    handlers::{
        ChapterWithParts, GetAdjacentChapterHandler, GetChapterHandler, GetNovelHandler,
        GetPartHandler, GetPartReaderHandler, ListChaptersHandler, ListNovelsHandler,
        ListPartsHandler, NovelDetail, PartReaderView,
    },
};

//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod image_storage;
mod repositories;

pub use image_storage::{ImageStorageError, ImageStoragePort, StoredImage, IMAGE_EXTENSIONS};
pub use repositories::{
    CascadeStats, ChapterRecord, ChapterRemoval, ChapterRepositoryPort, Direction, NovelRecord,
    NovelRepositoryPort, PartChangeSet, PartRecord, PartRepositoryPort, PartSiblings,
    RepositoryError,
};

//! Storage Adapters - 文件存储实现

mod file_storage;

pub use file_storage::FileImageStorage;

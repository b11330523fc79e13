//! Image Storage Port - 出站端口
//!
//! 定义封面图片上传存储的抽象接口

use async_trait::async_trait;
use thiserror::Error;

/// 图片存储错误
#[derive(Debug, Error)]
pub enum ImageStorageError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes, limit {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 允许上传的图片扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// 已保存的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// 存储目录下的文件名
    pub file_name: String,
    /// 对外访问路径，如 `/uploads/<file_name>`
    pub url: String,
    pub size: u64,
}

/// Image Storage Port
#[async_trait]
pub trait ImageStoragePort: Send + Sync {
    /// 保存图片，`original_name` 仅用于推断扩展名
    async fn save_image(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredImage, ImageStorageError>;
}

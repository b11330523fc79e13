//! File Storage - 文件系统图片存储实现
//!
//! 实现 ImageStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{
    ImageStorageError, ImageStoragePort, StoredImage, IMAGE_EXTENSIONS,
};

/// 文件系统图片存储
pub struct FileImageStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 对外访问前缀，如 `/uploads`
    url_prefix: String,
    /// 单个文件大小上限（字节）
    max_size: u64,
}

impl FileImageStorage {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        url_prefix: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, ImageStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// 取小写扩展名并校验是否为允许的图片格式
fn image_extension(original_name: &str) -> Result<String, ImageStorageError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ImageStorageError::UnsupportedFormat(
            original_name.to_string(),
        ))
    }
}

#[async_trait]
impl ImageStoragePort for FileImageStorage {
    async fn save_image(
        &self,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredImage, ImageStorageError> {
        let extension = image_extension(original_name)?;

        let size = data.len() as u64;
        if size > self.max_size {
            return Err(ImageStorageError::TooLarge {
                size,
                limit: self.max_size,
            });
        }

        let file_name = format!("image-{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.base_dir.join(&file_name);

        fs::write(&path, data)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        tracing::debug!(path = %path.display(), size = size, "Saved image");

        Ok(StoredImage {
            url: format!("{}/{}", self.url_prefix, file_name),
            file_name,
            size,
        })
    }
}

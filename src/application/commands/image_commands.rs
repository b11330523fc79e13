//! Image Commands

/// 上传封面图片命令
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub file_name: String,
    pub data: Vec<u8>,
}

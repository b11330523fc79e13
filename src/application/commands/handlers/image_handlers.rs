//! Image Command Handlers

use std::sync::Arc;

use crate::application::commands::UploadImage;
use crate::application::error::ApplicationError;
use crate::application::ports::{ImageStoragePort, StoredImage};

/// UploadImage Handler
pub struct UploadImageHandler {
    image_storage: Arc<dyn ImageStoragePort>,
}

impl UploadImageHandler {
    pub fn new(image_storage: Arc<dyn ImageStoragePort>) -> Self {
        Self { image_storage }
    }

    pub async fn handle(&self, command: UploadImage) -> Result<StoredImage, ApplicationError> {
        if command.data.is_empty() {
            return Err(ApplicationError::validation("Image file is empty"));
        }

        let stored = self
            .image_storage
            .save_image(&command.file_name, &command.data)
            .await?;

        tracing::info!(
            file_name = %stored.file_name,
            original_name = %command.file_name,
            size = stored.size,
            "Image uploaded"
        );

        Ok(stored)
    }
}

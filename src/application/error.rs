//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{ImageStorageError, RepositoryError};
use crate::domain::novel::NovelError;
use crate::domain::ordering::OrderingError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 相邻资源不存在（如没有下一章）
    #[error("{0}")]
    NoNeighbor(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 并发修改冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 读取之后被并发删除
            RepositoryError::NotFound { resource_type, id } => Self::NotFound { resource_type, id },
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Duplicate(msg) => Self::ValidationError(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<NovelError> for ApplicationError {
    fn from(err: NovelError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<OrderingError> for ApplicationError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::OutOfRange { .. } => Self::ValidationError(err.to_string()),
            // 快照中找不到自身，说明分段在读取后被并发删除
            OrderingError::UnknownItem => Self::Conflict(err.to_string()),
        }
    }
}

impl From<ImageStorageError> for ApplicationError {
    fn from(err: ImageStorageError) -> Self {
        match err {
            ImageStorageError::UnsupportedFormat(_) | ImageStorageError::TooLarge { .. } => {
                Self::ValidationError(err.to_string())
            }
            ImageStorageError::IoError(msg) => Self::StorageError(msg),
        }
    }
}

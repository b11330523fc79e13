//! Novel Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NovelError {
    #[error("Invalid title: {0}")]
    InvalidTitle(&'static str),

    #[error("Invalid content: {0}")]
    InvalidContent(&'static str),

    #[error("Invalid chapter type \"{0}\". Must be either \"main\" or \"side\"")]
    InvalidChapterType(String),

    #[error("Invalid order {0}. Must be a positive number")]
    InvalidOrder(i64),
}

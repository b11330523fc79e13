//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};

use super::NovelError;

/// 未提供简介时的默认值
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// 标题（小说 / 章节 / 分段通用）
///
/// 去除首尾空白后不可为空，长度不超过 200 字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, NovelError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(NovelError::InvalidTitle("title is required"));
        }
        if title.chars().count() > 200 {
            return Err(NovelError::InvalidTitle(
                "title cannot exceed 200 characters",
            ));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 分段正文（富文本 HTML）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content(String);

impl Content {
    pub fn new(content: impl Into<String>) -> Result<Self, NovelError> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(NovelError::InvalidContent("content is required"));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 章节类型：正篇 / 番外
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterType {
    Main,
    Side,
}

impl ChapterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterType::Main => "main",
            ChapterType::Side => "side",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "main" => Some(ChapterType::Main),
            "side" => Some(ChapterType::Side),
            _ => None,
        }
    }

    /// 解析请求中的类型字段
    pub fn parse(s: &str) -> Result<Self, NovelError> {
        Self::from_str(s).ok_or_else(|| NovelError::InvalidChapterType(s.to_string()))
    }
}

impl std::fmt::Display for ChapterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 排序号，从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(u32);

impl Order {
    pub fn new(value: i64) -> Result<Self, NovelError> {
        if value < 1 || value > u32::MAX as i64 {
            return Err(NovelError::InvalidOrder(value));
        }
        Ok(Self(value as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

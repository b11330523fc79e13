//! Novelist - 连载小说发布后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说 / 章节 / 分段的值对象与章节引用
//! - Ordering: 分段 order 的稠密序列维护
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, ImageStorage）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Auth: JWT 管理员校验
//! - Persistence: SQLite 存储
//! - Adapters: 图片文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

//! Mangalog - 漫画阅读记录服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Manga Context: 阅读记录、评分、标题等值对象
//! - Reading Progress: 阅读阶段分级与成就
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repository, BookSearch, Auth, FormSession, Notifier, Navigator）
//! - Form: 四步表单向导控制器
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API + WebSocket
//! - Memory: 登录令牌与表单会话
//! - Worker: 闲置表单回收
//! - Persistence: SQLite
//! - Adapters: Google Books 检索
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::manga::{MangaId, MangaRecord, UserId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Manga Repository Port
#[async_trait]
pub trait MangaRepositoryPort: Send + Sync {
    /// 保存记录（存在则覆盖）
    async fn save(&self, record: &MangaRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找记录
    async fn find_by_id(&self, id: MangaId) -> Result<Option<MangaRecord>, RepositoryError>;

    /// 获取用户的所有记录（按 updated_at 倒序）
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<MangaRecord>, RepositoryError>;

    /// 删除记录
    async fn delete(&self, id: MangaId) -> Result<(), RepositoryError>;
}

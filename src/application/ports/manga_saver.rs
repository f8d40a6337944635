//! Manga Save Port - 表单提交的持久化出口

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::manga::{MangaInput, MangaRecord};

/// 提交错误，消息原样展示给用户
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Manga log not found or unauthorized")]
    NotFoundOrUnauthorized,

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Unexpected(String),
}

/// 保存结果
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub record: MangaRecord,
    /// true 表示新建，false 表示更新
    pub created: bool,
}

/// Manga Save Port
#[async_trait]
pub trait MangaSavePort: Send + Sync {
    async fn save(&self, input: MangaInput) -> Result<SaveOutcome, SubmissionError>;
}

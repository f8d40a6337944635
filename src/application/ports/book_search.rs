//! Book Search Port - 外部书目检索
//!
//! 检索结果用于表单的“从搜索结果选择”操作

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 书目检索错误
#[derive(Debug, Error)]
pub enum BookSearchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API request failed: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 检索结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookHit {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// 已规范为 https
    pub thumbnail: Option<String>,
    pub published_date: Option<String>,
}

/// Book Search Port
#[async_trait]
pub trait BookSearchPort: Send + Sync {
    /// 按标题检索，空白查询返回空列表
    async fn search(&self, query: &str) -> Result<Vec<BookHit>, BookSearchError>;
}

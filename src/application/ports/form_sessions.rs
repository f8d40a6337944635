//! Form Session Manager Port - 表单向导会话生命周期
//!
//! 每个会话持有一个 StepFormController，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::form::StepFormController;
use crate::domain::manga::UserId;

/// Form Session 错误
#[derive(Debug, Error)]
pub enum FormSessionError {
    #[error("Form session not found: {0}")]
    NotFound(String),

    #[error("Form session already exists: {0}")]
    AlreadyExists(String),

    #[error("Form session belongs to another user: {0}")]
    Forbidden(String),
}

/// 表单会话（in-memory）
#[derive(Clone)]
pub struct FormSession {
    pub id: String,
    pub user_id: UserId,
    pub controller: Arc<StepFormController>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl FormSession {
    pub fn new(id: String, user_id: UserId, controller: Arc<StepFormController>) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            controller,
            created_at: now,
            last_activity: now,
        }
    }

    /// 生成新的会话 ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("last_activity", &self.last_activity)
            .finish()
    }
}

/// Form Session Manager Port
pub trait FormSessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: FormSession) -> Result<String, FormSessionError>;

    /// 获取会话（校验归属）
    fn get(&self, id: &str, user_id: &UserId) -> Result<FormSession, FormSessionError>;

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), FormSessionError>;

    /// 更新最后活动时间
    fn touch(&self, id: &str);

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 获取所有会话 ID
    fn list_all(&self) -> Vec<String>;
}

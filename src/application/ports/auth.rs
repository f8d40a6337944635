//! Auth Port - 当前用户身份
//!
//! OAuth 登录流程在外部完成，这里只负责把凭证解析为用户

use serde::Serialize;

use crate::domain::manga::UserId;

/// 已认证用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
}

/// Auth Port
pub trait AuthPort: Send + Sync {
    /// 将 bearer token 解析为用户，无效时返回 None
    fn resolve(&self, token: &str) -> Option<AuthUser>;
}

//! In-Memory Auth Session Store
//!
//! bearer token -> 用户，OAuth 登录完成后由外部写入

use dashmap::DashMap;

use crate::application::ports::{AuthPort, AuthUser};
use crate::domain::manga::UserId;

/// 内存 token 存储
pub struct InMemoryAuthStore {
    tokens: DashMap<String, AuthUser>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// 登记 token
    pub fn issue(&self, token: impl Into<String>, user_id: UserId, name: impl Into<String>) {
        let user = AuthUser {
            id: user_id,
            name: name.into(),
        };
        tracing::debug!(user_id = %user.id, "Auth token issued");
        self.tokens.insert(token.into(), user);
    }

    /// 吊销 token，返回是否存在
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for InMemoryAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthPort for InMemoryAuthStore {
    fn resolve(&self, token: &str) -> Option<AuthUser> {
        self.tokens.get(token).map(|user| user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_resolve_revoke() {
        let store = InMemoryAuthStore::new();
        assert!(store.resolve("t1").is_none());

        store.issue("t1", UserId::new("u1"), "Alice");
        let user = store.resolve("t1").unwrap();
        assert_eq!(user.id, UserId::new("u1"));
        assert_eq!(user.name, "Alice");
        assert_eq!(store.len(), 1);

        assert!(store.revoke("t1"));
        assert!(!store.revoke("t1"));
        assert!(store.resolve("t1").is_none());
        assert!(store.is_empty());
    }
}

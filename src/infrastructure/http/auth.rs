//! Request Authentication
//!
//! 从 `Authorization: Bearer <token>` 或 `?token=<token>`（WebSocket）解析当前用户

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::application::AuthUser;
use crate::domain::manga::UserId;

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// 当前用户（未登录为 None）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthUser>);

impl CurrentUser {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.id.clone())
    }

    /// 要求已登录
    pub fn require(self) -> Result<AuthUser, ApiError> {
        self.0
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token)
    })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts)
            .filter(|token| !token.is_empty())
            .and_then(|token| state.auth.resolve(&token));
        Ok(CurrentUser(user))
    }
}

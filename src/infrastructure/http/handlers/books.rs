//! Book Search Handler

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{BookHit, SearchBooks};
use crate::infrastructure::http::dto::{ApiResponse, BookSearchRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 检索漫画书目（空白查询返回空列表）
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(request): Query<BookSearchRequest>,
) -> Result<Json<ApiResponse<Vec<BookHit>>>, ApiError> {
    let hits = state
        .search_books_handler
        .handle(SearchBooks { query: request.q })
        .await?;
    Ok(Json(ApiResponse::success(hits)))
}

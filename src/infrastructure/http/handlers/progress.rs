//! Reading Progress Handler
//!
//! 无状态：按卷数 / 话数返回进度分类与成就

use axum::Json;
use serde::Serialize;

use crate::domain::reading_progress::{
    reading_achievement, reading_progress, Achievement, ProgressInfo,
};
use crate::infrastructure::http::dto::{ApiResponse, ProgressRequest};

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: ProgressInfo,
    pub achievement: Achievement,
}

pub async fn classify_progress(
    Json(request): Json<ProgressRequest>,
) -> Json<ApiResponse<ProgressResponse>> {
    let volume = request.volume_progress;
    let chapter = request.chapter_progress;

    Json(ApiResponse::success(ProgressResponse {
        progress: reading_progress(volume, chapter),
        achievement: reading_achievement(volume, chapter),
    }))
}

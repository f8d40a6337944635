//! Manga HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{
    CollectionStats, DeleteManga, GetCollectionStats, GetManga, ListMangaLogs, MangaView,
    SaveManga, ValidationRules,
};
use crate::domain::manga::{MangaId, MangaInput, Score, Thumbnail, Title};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{
    ApiResponse, Empty, ListMangaRequest, MangaIdRequest, SaveMangaRequest, SaveMangaResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

impl SaveMangaRequest {
    /// 按当前校验规则转换为领域输入
    fn into_input(self, rules: &ValidationRules) -> Result<MangaInput, ApiError> {
        let score = self
            .score
            .map(|value| Score::new(value, rules.score_floor))
            .transpose()?;
        let chapter_progress = self
            .chapter_progress
            .map(|value| rules.chapter_precision.check(value))
            .transpose()?;
        let thumbnail = self
            .thumbnail
            .filter(|url| !url.trim().is_empty())
            .map(Thumbnail::new)
            .transpose()?;

        Ok(MangaInput {
            id: self.id.map(MangaId::from_uuid),
            title: Title::new(self.title)?,
            score,
            is_completed: self.is_completed,
            volume_progress: self.volume_progress,
            chapter_progress,
            note: self.note,
            thumbnail,
        })
    }
}

/// 列出当前用户的阅读记录（未登录返回空列表）
pub async fn list_manga(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(request): Query<ListMangaRequest>,
) -> Result<Json<ApiResponse<Vec<MangaView>>>, ApiError> {
    let query = ListMangaLogs {
        user: user.user_id(),
        search: request.search,
        status: request.status,
        sort: request.sort,
    };

    let views = state.list_manga_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(views)))
}

/// 获取单条阅读记录
pub async fn get_manga(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<MangaIdRequest>,
) -> Result<Json<ApiResponse<MangaView>>, ApiError> {
    let query = GetManga {
        user: user.user_id(),
        manga_id: MangaId::from_uuid(request.id),
    };

    let view = state.get_manga_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// 新建或更新阅读记录
pub async fn save_manga(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<SaveMangaRequest>,
) -> Result<Json<ApiResponse<SaveMangaResponse<MangaView>>>, ApiError> {
    let user_id = user.user_id();
    let input = request.into_input(&state.form_options.rules)?;

    let outcome = state
        .save_manga_handler
        .handle(SaveManga {
            user: user_id,
            input,
        })
        .await?;

    let record = outcome.record;
    state.event_publisher.publish_manga_saved(
        record.id,
        &record.user_id,
        record.title.as_str(),
        outcome.created,
    );

    Ok(Json(ApiResponse::success(SaveMangaResponse {
        created: outcome.created,
        manga: MangaView::from(record),
    })))
}

/// 删除阅读记录
pub async fn delete_manga(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(request): Json<MangaIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let user = user.require()?;
    let manga_id = MangaId::from_uuid(request.id);

    state
        .delete_manga_handler
        .handle(DeleteManga {
            user: Some(user.id.clone()),
            manga_id,
        })
        .await?;

    state.event_publisher.publish_manga_deleted(manga_id, &user.id);

    Ok(Json(ApiResponse::ok()))
}

/// 收藏统计
pub async fn collection_stats(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<CollectionStats>>, ApiError> {
    let stats = state
        .collection_stats_handler
        .handle(GetCollectionStats {
            user: user.user_id(),
        })
        .await?;
    Ok(Json(ApiResponse::success(stats)))
}

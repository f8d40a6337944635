//! Manga Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::MangaRepositoryPort;
use crate::application::queries::{GetCollectionStats, GetManga, ListMangaLogs};
use crate::domain::manga::MangaRecord;
use crate::domain::reading_progress::{Achievement, ProgressInfo};

// ============================================================================
// Response DTOs
// ============================================================================

/// 阅读记录 + 进度分类
#[derive(Debug, Clone, Serialize)]
pub struct MangaView {
    #[serde(flatten)]
    pub record: MangaRecord,
    pub progress: ProgressInfo,
    pub achievement: Achievement,
}

impl From<MangaRecord> for MangaView {
    fn from(record: MangaRecord) -> Self {
        Self {
            progress: record.reading_progress(),
            achievement: record.achievement(),
            record,
        }
    }
}

/// 收藏统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// 仅统计评分非零的记录，无评分时为 0
    pub avg_score: f64,
}

impl CollectionStats {
    pub fn from_records(records: &[MangaRecord]) -> Self {
        let total = records.len();
        let completed = records.iter().filter(|r| r.is_completed).count();

        let scores: Vec<f64> = records
            .iter()
            .filter_map(|r| r.score.map(|s| s.value()))
            .filter(|s| *s != 0.0)
            .collect();
        let avg_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        Self {
            total,
            completed,
            in_progress: total - completed,
            avg_score,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListMangaLogs Handler
pub struct ListMangaLogsHandler {
    manga_repo: Arc<dyn MangaRepositoryPort>,
}

impl ListMangaLogsHandler {
    pub fn new(manga_repo: Arc<dyn MangaRepositoryPort>) -> Self {
        Self { manga_repo }
    }

    /// 未登录返回空列表
    pub async fn handle(&self, query: ListMangaLogs) -> Result<Vec<MangaView>, ApplicationError> {
        let Some(user) = query.user.as_ref() else {
            return Ok(Vec::new());
        };

        let records = self.manga_repo.find_by_user(user).await?;
        Ok(query
            .apply(records)
            .into_iter()
            .map(MangaView::from)
            .collect())
    }
}

/// GetManga Handler
pub struct GetMangaHandler {
    manga_repo: Arc<dyn MangaRepositoryPort>,
}

impl GetMangaHandler {
    pub fn new(manga_repo: Arc<dyn MangaRepositoryPort>) -> Self {
        Self { manga_repo }
    }

    pub async fn handle(&self, query: GetManga) -> Result<MangaView, ApplicationError> {
        let user = query.user.ok_or(ApplicationError::Unauthorized)?;
        let id = query.manga_id;

        let record = self
            .manga_repo
            .find_by_id(id)
            .await?
            .filter(|r| r.is_owned_by(&user))
            .ok_or_else(|| ApplicationError::not_found("Manga log", *id.as_uuid()))?;

        Ok(MangaView::from(record))
    }
}

/// GetCollectionStats Handler
pub struct GetCollectionStatsHandler {
    manga_repo: Arc<dyn MangaRepositoryPort>,
}

impl GetCollectionStatsHandler {
    pub fn new(manga_repo: Arc<dyn MangaRepositoryPort>) -> Self {
        Self { manga_repo }
    }

    pub async fn handle(&self, query: GetCollectionStats) -> Result<CollectionStats, ApplicationError> {
        let Some(user) = query.user.as_ref() else {
            return Ok(CollectionStats::default());
        };

        let records = self.manga_repo.find_by_user(user).await?;
        Ok(CollectionStats::from_records(&records))
    }
}

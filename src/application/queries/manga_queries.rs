//! Manga Queries

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::manga::{MangaId, MangaRecord, UserId};

/// 完成状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    InProgress,
}

impl StatusFilter {
    pub fn matches(&self, record: &MangaRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => record.is_completed,
            StatusFilter::InProgress => !record.is_completed,
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// 最近更新在前
    #[default]
    Updated,
    /// 标题 A-Z（不区分大小写）
    Title,
    /// 评分从高到低，未评分按 0
    Score,
}

impl SortBy {
    pub fn sort(&self, records: &mut [MangaRecord]) {
        match self {
            SortBy::Updated => records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            SortBy::Title => records.sort_by_cached_key(|r| r.title.as_str().to_lowercase()),
            SortBy::Score => records.sort_by(|a, b| {
                let score = |r: &MangaRecord| r.score.map(|s| s.value()).unwrap_or(0.0);
                score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal)
            }),
        }
    }
}

/// 列出当前用户的阅读记录
#[derive(Debug, Clone, Default)]
pub struct ListMangaLogs {
    pub user: Option<UserId>,
    /// 标题子串（不区分大小写）
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort: SortBy,
}

impl ListMangaLogs {
    /// 过滤并排序
    pub fn apply(&self, records: Vec<MangaRecord>) -> Vec<MangaRecord> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut records: Vec<MangaRecord> = records
            .into_iter()
            .filter(|r| match &needle {
                Some(needle) => r.title.as_str().to_lowercase().contains(needle),
                None => true,
            })
            .filter(|r| self.status.matches(r))
            .collect();

        self.sort.sort(&mut records);
        records
    }
}

/// 获取单条阅读记录
#[derive(Debug, Clone)]
pub struct GetManga {
    pub user: Option<UserId>,
    pub manga_id: MangaId,
}

/// 收藏统计
#[derive(Debug, Clone)]
pub struct GetCollectionStats {
    pub user: Option<UserId>,
}

/// 外部书目检索
#[derive(Debug, Clone)]
pub struct SearchBooks {
    pub query: String,
}

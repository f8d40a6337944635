//! Manga Context - Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MangaId, Score, Thumbnail, Title, UserId};
use crate::domain::reading_progress::{
    reading_achievement, reading_progress, Achievement, ProgressInfo,
};

/// 漫画阅读记录
///
/// 不变量:
/// - id 创建后不可变
/// - 记录只属于创建它的用户
/// - created_at / updated_at 由持久化边界维护
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaRecord {
    pub id: MangaId,
    pub user_id: UserId,
    pub title: Title,
    pub score: Option<Score>,
    pub is_completed: bool,
    pub volume_progress: Option<u32>,
    pub chapter_progress: Option<f64>,
    pub note: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 已校验的待保存数据
///
/// `id` 为空表示新建，否则为更新
#[derive(Debug, Clone, PartialEq)]
pub struct MangaInput {
    pub id: Option<MangaId>,
    pub title: Title,
    pub score: Option<Score>,
    pub is_completed: bool,
    pub volume_progress: Option<u32>,
    pub chapter_progress: Option<f64>,
    pub note: Option<String>,
    pub thumbnail: Option<Thumbnail>,
}

impl MangaInput {
    /// 仅含标题的最小输入
    pub fn titled(title: Title) -> Self {
        Self {
            id: None,
            title,
            score: None,
            is_completed: false,
            volume_progress: None,
            chapter_progress: None,
            note: None,
            thumbnail: None,
        }
    }
}

impl MangaRecord {
    /// 新建记录
    pub fn create(id: MangaId, user_id: UserId, input: MangaInput) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            title: input.title,
            score: input.score,
            is_completed: input.is_completed,
            volume_progress: input.volume_progress,
            chapter_progress: input.chapter_progress,
            note: normalize_note(input.note),
            thumbnail: input.thumbnail,
            created_at: now,
            updated_at: now,
        }
    }

    /// 覆盖可编辑字段
    pub fn apply(&mut self, input: MangaInput) {
        self.title = input.title;
        self.score = input.score;
        self.is_completed = input.is_completed;
        self.volume_progress = input.volume_progress;
        self.chapter_progress = input.chapter_progress;
        self.note = normalize_note(input.note);
        self.thumbnail = input.thumbnail;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }

    pub fn reading_progress(&self) -> ProgressInfo {
        reading_progress(self.volume_progress, self.chapter_progress)
    }

    pub fn achievement(&self) -> Achievement {
        reading_achievement(self.volume_progress, self.chapter_progress)
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}

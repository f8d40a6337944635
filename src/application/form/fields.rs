//! Form Fields - 草稿与字段描述

use serde::Serialize;

use super::FormStep;
use crate::domain::manga::{MangaId, MangaRecord};

/// 文本输入字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Title,
    Score,
    VolumeProgress,
    ChapterProgress,
    Note,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Title,
        FieldName::Score,
        FieldName::VolumeProgress,
        FieldName::ChapterProgress,
        FieldName::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Score => "score",
            FieldName::VolumeProgress => "volume_progress",
            FieldName::ChapterProgress => "chapter_progress",
            FieldName::Note => "note",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|name| name.as_str() == s)
    }

    /// 字段所在步骤
    pub fn step(&self) -> FormStep {
        match self {
            FieldName::Title => FormStep::BasicInfo,
            FieldName::Score => FormStep::RatingStatus,
            FieldName::VolumeProgress | FieldName::ChapterProgress => FormStep::Progress,
            FieldName::Note => FormStep::Notes,
        }
    }
}

/// 字段描述 {name, value, errors}
///
/// value 保留用户输入的原始字符串，解析在校验阶段显式完成
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub value: String,
    pub errors: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(name: FieldName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 表单草稿
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MangaDraft {
    /// 编辑模式下为已有记录 ID
    pub id: Option<MangaId>,
    pub title: FieldDescriptor,
    pub score: FieldDescriptor,
    pub volume_progress: FieldDescriptor,
    pub chapter_progress: FieldDescriptor,
    pub note: FieldDescriptor,
    pub is_completed: bool,
    pub thumbnail: Option<String>,
}

impl MangaDraft {
    /// 新建模式的空草稿
    pub fn empty() -> Self {
        Self {
            id: None,
            title: FieldDescriptor::new(FieldName::Title, ""),
            score: FieldDescriptor::new(FieldName::Score, ""),
            volume_progress: FieldDescriptor::new(FieldName::VolumeProgress, ""),
            chapter_progress: FieldDescriptor::new(FieldName::ChapterProgress, ""),
            note: FieldDescriptor::new(FieldName::Note, ""),
            is_completed: false,
            thumbnail: None,
        }
    }

    /// 编辑模式：从已有记录填充
    pub fn from_record(record: &MangaRecord) -> Self {
        fn text<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            id: Some(record.id),
            title: FieldDescriptor::new(FieldName::Title, record.title.as_str()),
            score: FieldDescriptor::new(FieldName::Score, text(record.score)),
            volume_progress: FieldDescriptor::new(
                FieldName::VolumeProgress,
                text(record.volume_progress),
            ),
            chapter_progress: FieldDescriptor::new(
                FieldName::ChapterProgress,
                text(record.chapter_progress),
            ),
            note: FieldDescriptor::new(FieldName::Note, record.note.clone().unwrap_or_default()),
            is_completed: record.is_completed,
            thumbnail: record.thumbnail.as_ref().map(|t| t.as_str().to_string()),
        }
    }

    pub fn field(&self, name: FieldName) -> &FieldDescriptor {
        match name {
            FieldName::Title => &self.title,
            FieldName::Score => &self.score,
            FieldName::VolumeProgress => &self.volume_progress,
            FieldName::ChapterProgress => &self.chapter_progress,
            FieldName::Note => &self.note,
        }
    }

    pub fn field_mut(&mut self, name: FieldName) -> &mut FieldDescriptor {
        match name {
            FieldName::Title => &mut self.title,
            FieldName::Score => &mut self.score,
            FieldName::VolumeProgress => &mut self.volume_progress,
            FieldName::ChapterProgress => &mut self.chapter_progress,
            FieldName::Note => &mut self.note,
        }
    }

    /// 所有字段（按步骤顺序）
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        FieldName::ALL.into_iter().map(move |name| self.field(name))
    }

    /// 带有字段错误的步骤（升序、去重）
    pub fn invalid_steps(&self) -> Vec<FormStep> {
        let mut steps: Vec<FormStep> = self
            .fields()
            .filter(|field| !field.is_valid())
            .map(|field| field.name.step())
            .collect();
        steps.dedup();
        steps
    }

    /// 清除某一步骤下所有字段的错误
    pub fn clear_step_errors(&mut self, step: FormStep) {
        for name in FieldName::ALL.into_iter().filter(|n| n.step() == step) {
            self.field_mut(name).errors.clear();
        }
    }
}

impl Default for MangaDraft {
    fn default() -> Self {
        Self::empty()
    }
}

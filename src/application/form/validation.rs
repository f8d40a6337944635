//! Form Validation - 逐步校验
//!
//! 所有数值字段都是字符串输入，这里显式解析，不做隐式类型转换。
//! 空白输入视为“未填写”，对可选字段合法。

use serde::Serialize;

use super::{FieldName, FormStep, MangaDraft};
use crate::domain::manga::{
    ChapterPrecision, MangaError, MangaInput, Score, ScoreFloor, Thumbnail, Title,
};

/// 校验规则（两种 schema 变体的差异）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationRules {
    pub score_floor: ScoreFloor,
    pub chapter_precision: ChapterPrecision,
}

/// 字段级错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldName,
    pub message: String,
}

impl FieldError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// 解析为有限数字
fn parse_number(raw: &str, label: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("{} must be a number", label))
}

pub fn parse_title(raw: &str) -> Result<Title, String> {
    Title::new(raw).map_err(|e| e.to_string())
}

pub fn parse_score(raw: &str, floor: ScoreFloor) -> Result<Option<Score>, String> {
    if blank(raw) {
        return Ok(None);
    }
    let value = parse_number(raw, "Score")?;
    Score::new(value, floor).map(Some).map_err(|e| e.to_string())
}

pub fn parse_volume(raw: &str) -> Result<Option<u32>, String> {
    if blank(raw) {
        return Ok(None);
    }
    let value = parse_number(raw, "Volume progress")?;
    if value < 0.0 {
        return Err("Volume progress cannot be negative".to_string());
    }
    if value.fract() != 0.0 {
        return Err("Volume progress must be a whole number".to_string());
    }
    if value > f64::from(u32::MAX) {
        return Err("Volume progress is too large".to_string());
    }
    Ok(Some(value as u32))
}

pub fn parse_chapter(raw: &str, precision: ChapterPrecision) -> Result<Option<f64>, String> {
    if blank(raw) {
        return Ok(None);
    }
    let value = parse_number(raw, "Chapter progress")?;
    precision
        .check(value)
        .map(Some)
        .map_err(|e: MangaError| e.to_string())
}

/// 校验单个步骤，返回该步骤的所有字段错误（空表示通过）
pub fn validate_step(step: FormStep, draft: &MangaDraft, rules: &ValidationRules) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match step {
        FormStep::BasicInfo => {
            if let Err(message) = parse_title(&draft.title.value) {
                errors.push(FieldError::new(FieldName::Title, message));
            }
        }
        FormStep::RatingStatus => {
            if let Err(message) = parse_score(&draft.score.value, rules.score_floor) {
                errors.push(FieldError::new(FieldName::Score, message));
            }
        }
        FormStep::Progress => {
            if let Err(message) = parse_volume(&draft.volume_progress.value) {
                errors.push(FieldError::new(FieldName::VolumeProgress, message));
            }
            if let Err(message) =
                parse_chapter(&draft.chapter_progress.value, rules.chapter_precision)
            {
                errors.push(FieldError::new(FieldName::ChapterProgress, message));
            }
        }
        FormStep::Notes => {}
    }

    errors
}

/// 记录解析错误并返回解析值
fn take<T>(result: Result<T, String>, field: FieldName, errors: &mut Vec<FieldError>) -> Option<T> {
    result
        .map_err(|message| errors.push(FieldError::new(field, message)))
        .ok()
}

/// 解析整份草稿为待保存数据，错误按步骤顺序返回
pub fn build_input(draft: &MangaDraft, rules: &ValidationRules) -> Result<MangaInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = take(parse_title(&draft.title.value), FieldName::Title, &mut errors);
    let score = take(
        parse_score(&draft.score.value, rules.score_floor),
        FieldName::Score,
        &mut errors,
    );
    let volume_progress = take(
        parse_volume(&draft.volume_progress.value),
        FieldName::VolumeProgress,
        &mut errors,
    );
    let chapter_progress = take(
        parse_chapter(&draft.chapter_progress.value, rules.chapter_precision),
        FieldName::ChapterProgress,
        &mut errors,
    );

    match (title, score, volume_progress, chapter_progress) {
        (Some(title), Some(score), Some(volume_progress), Some(chapter_progress)) => {
            let note = draft.note.value.trim();
            Ok(MangaInput {
                id: draft.id,
                title,
                score,
                is_completed: draft.is_completed,
                volume_progress,
                chapter_progress,
                note: (!note.is_empty()).then(|| note.to_string()),
                thumbnail: draft
                    .thumbnail
                    .as_deref()
                    .and_then(|url| Thumbnail::new(url).ok()),
            })
        }
        _ => Err(errors),
    }
}

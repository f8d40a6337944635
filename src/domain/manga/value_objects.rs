//! Manga Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MangaError;

/// 阅读记录唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MangaId(Uuid);

impl MangaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse(s: &str) -> Result<Self, MangaError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| MangaError::InvalidId(e.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MangaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MangaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 用户标识（由认证服务签发，不透明字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 漫画标题
///
/// 不变量:
/// - 去除首尾空白后非空（不限长度）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, MangaError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(MangaError::InvalidTitle("Title is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 评分下限
///
/// 两种已存在的数据变体：0 表示“未评分”允许存在，或要求至少 1 分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScoreFloor {
    #[default]
    Zero,
    One,
}

impl ScoreFloor {
    pub fn value(self) -> f64 {
        match self {
            ScoreFloor::Zero => 0.0,
            ScoreFloor::One => 1.0,
        }
    }
}

impl TryFrom<u8> for ScoreFloor {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ScoreFloor::Zero),
            1 => Ok(ScoreFloor::One),
            other => Err(format!("score minimum must be 0 or 1, got {}", other)),
        }
    }
}

impl From<ScoreFloor> for u8 {
    fn from(floor: ScoreFloor) -> Self {
        match floor {
            ScoreFloor::Zero => 0,
            ScoreFloor::One => 1,
        }
    }
}

/// 话数精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterPrecision {
    /// 仅整数话
    Whole,
    /// 允许小数（如 12.5 表示读到一半）
    #[default]
    Decimal,
}

impl ChapterPrecision {
    /// 校验话数
    pub fn check(self, chapter: f64) -> Result<f64, MangaError> {
        if !chapter.is_finite() {
            return Err(MangaError::InvalidProgress(
                "Chapter progress must be a number".to_string(),
            ));
        }
        if chapter < 0.0 {
            return Err(MangaError::InvalidProgress(
                "Chapter progress cannot be negative".to_string(),
            ));
        }
        if self == ChapterPrecision::Whole && chapter.fract() != 0.0 {
            return Err(MangaError::InvalidProgress(
                "Chapter progress must be a whole number".to_string(),
            ));
        }
        Ok(chapter)
    }
}

/// 评分，[下限, 5.0]，保留一位小数
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const MAX: f64 = 5.0;

    pub fn new(value: f64, floor: ScoreFloor) -> Result<Self, MangaError> {
        if !value.is_finite() {
            return Err(MangaError::InvalidScore("Score must be a number".to_string()));
        }
        if value < floor.value() || value > Self::MAX {
            return Err(MangaError::InvalidScore(format!(
                "Score must be between {} and {}",
                floor.value(),
                Self::MAX
            )));
        }
        Ok(Self((value * 10.0).round() / 10.0))
    }

    /// 从存储恢复（不做范围校验）
    pub fn from_stored(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 将 `http:` 协议替换为 `https:`
pub fn normalize_https(url: &str) -> String {
    url.replacen("http:", "https:", 1)
}

/// 封面缩略图 URL（始终为 https）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thumbnail(String);

impl Thumbnail {
    pub fn new(url: impl AsRef<str>) -> Result<Self, MangaError> {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(MangaError::InvalidThumbnail("URL is empty".to_string()));
        }
        Ok(Self(normalize_https(url)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        let title = Title::new("  Naruto ").unwrap();
        assert_eq!(title.as_str(), "Naruto");
        assert!(Title::new("   ").is_err());
        assert_eq!(Title::new("a".repeat(500)).unwrap().as_str().len(), 500);
    }

    #[test]
    fn test_score_bounds_follow_floor() {
        assert!(Score::new(0.0, ScoreFloor::Zero).is_ok());
        assert!(Score::new(0.0, ScoreFloor::One).is_err());
        assert!(Score::new(5.0, ScoreFloor::One).is_ok());
        assert!(Score::new(5.1, ScoreFloor::Zero).is_err());
        assert!(Score::new(f64::NAN, ScoreFloor::Zero).is_err());
        assert_eq!(Score::new(4.26, ScoreFloor::Zero).unwrap().value(), 4.3);
    }

    #[test]
    fn test_chapter_precision() {
        assert_eq!(ChapterPrecision::Decimal.check(12.5).unwrap(), 12.5);
        assert!(ChapterPrecision::Whole.check(12.5).is_err());
        assert!(ChapterPrecision::Whole.check(12.0).is_ok());
        assert!(ChapterPrecision::Decimal.check(-1.0).is_err());
    }

    #[test]
    fn test_score_floor_from_number() {
        assert_eq!(ScoreFloor::try_from(0).unwrap(), ScoreFloor::Zero);
        assert_eq!(ScoreFloor::try_from(1).unwrap(), ScoreFloor::One);
        assert!(ScoreFloor::try_from(2).is_err());
    }

    #[test]
    fn test_thumbnail_forced_to_https() {
        let thumb = Thumbnail::new("http://x/img.png").unwrap();
        assert_eq!(thumb.as_str(), "https://x/img.png");
        let thumb = Thumbnail::new("https://x/img.png").unwrap();
        assert_eq!(thumb.as_str(), "https://x/img.png");
        assert!(Thumbnail::new("").is_err());
    }

    #[test]
    fn test_manga_id_parse() {
        let id = MangaId::new();
        assert_eq!(MangaId::parse(&id.to_string()).unwrap(), id);
        assert!(MangaId::parse("not-a-uuid").is_err());
    }
}

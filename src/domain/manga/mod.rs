//! Manga Context - 漫画阅读记录上下文
//!
//! 职责:
//! - 阅读记录实体
//! - 标题、评分、缩略图等值对象
//! - 两种 schema 变体（评分下限、话数精度）

mod entity;
mod errors;
mod value_objects;

pub use entity::{MangaInput, MangaRecord};
pub use errors::MangaError;
pub use value_objects::{
    normalize_https, ChapterPrecision, MangaId, Score, ScoreFloor, Thumbnail, Title, UserId,
};

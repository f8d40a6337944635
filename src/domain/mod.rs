//! Domain Layer - 领域层
//!
//! - Manga Context: 漫画阅读记录
//! - Reading Progress: 阅读进度分级（纯函数）

pub mod manga;
pub mod reading_progress;

pub use reading_progress::{
    effective_volumes, reading_achievement, reading_progress, Achievement, ProgressInfo,
    ProgressStage,
};

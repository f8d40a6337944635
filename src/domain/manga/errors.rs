//! Manga Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MangaError {
    #[error("{0}")]
    InvalidTitle(String),

    #[error("{0}")]
    InvalidScore(String),

    #[error("{0}")]
    InvalidProgress(String),

    #[error("Invalid thumbnail: {0}")]
    InvalidThumbnail(String),

    #[error("Invalid manga id: {0}")]
    InvalidId(String),
}

//! Manga Command Handlers

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::commands::{DeleteManga, SaveManga};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    MangaRepositoryPort, MangaSavePort, SaveOutcome, SubmissionError,
};
use crate::domain::manga::{MangaId, MangaInput, MangaRecord, UserId};

// ============================================================================
// SaveManga
// ============================================================================

/// SaveManga Handler - 新建或更新阅读记录
#[derive(Clone)]
pub struct SaveMangaHandler {
    manga_repo: Arc<dyn MangaRepositoryPort>,
}

impl SaveMangaHandler {
    pub fn new(manga_repo: Arc<dyn MangaRepositoryPort>) -> Self {
        Self { manga_repo }
    }

    /// 无 id 时新建；有 id 时仅当记录存在且属于当前用户才更新
    pub async fn handle(&self, command: SaveManga) -> Result<SaveOutcome, ApplicationError> {
        let user = command.user.ok_or(ApplicationError::Unauthorized)?;
        let input = command.input;

        let (record, created) = match input.id {
            None => (MangaRecord::create(MangaId::new(), user.clone(), input), true),
            Some(id) => {
                // 不存在与不属于当前用户返回同一错误，不暴露记录是否存在
                let mut record = self
                    .manga_repo
                    .find_by_id(id)
                    .await?
                    .filter(|r| r.is_owned_by(&user))
                    .ok_or_else(|| ApplicationError::not_found("Manga log", *id.as_uuid()))?;
                record.apply(input);
                (record, false)
            }
        };

        self.manga_repo.save(&record).await?;

        tracing::info!(
            manga_id = %record.id,
            user_id = %user,
            title = %record.title,
            created,
            "Manga log saved"
        );

        Ok(SaveOutcome { record, created })
    }
}

// ============================================================================
// ScopedMangaSaver (form submit -> SaveManga)
// ============================================================================

/// 绑定到某个用户的保存出口，供表单控制器使用
pub struct ScopedMangaSaver {
    handler: SaveMangaHandler,
    user: Option<UserId>,
}

impl ScopedMangaSaver {
    pub fn new(handler: SaveMangaHandler, user: Option<UserId>) -> Self {
        Self { handler, user }
    }
}

#[async_trait]
impl MangaSavePort for ScopedMangaSaver {
    async fn save(&self, input: MangaInput) -> Result<SaveOutcome, SubmissionError> {
        let command = SaveManga {
            user: self.user.clone(),
            input,
        };
        self.handler.handle(command).await.map_err(|e| match e {
            ApplicationError::Unauthorized => SubmissionError::Unauthorized,
            ApplicationError::NotFound { .. } | ApplicationError::Forbidden(_) => {
                SubmissionError::NotFoundOrUnauthorized
            }
            other => SubmissionError::Unexpected(other.to_string()),
        })
    }
}

// ============================================================================
// DeleteManga
// ============================================================================

/// DeleteManga Handler
pub struct DeleteMangaHandler {
    manga_repo: Arc<dyn MangaRepositoryPort>,
}

impl DeleteMangaHandler {
    pub fn new(manga_repo: Arc<dyn MangaRepositoryPort>) -> Self {
        Self { manga_repo }
    }

    pub async fn handle(&self, command: DeleteManga) -> Result<(), ApplicationError> {
        let user = command.user.ok_or(ApplicationError::Unauthorized)?;
        let id = command.manga_id;

        let record = self
            .manga_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Manga log", *id.as_uuid()))?;

        if !record.is_owned_by(&user) {
            tracing::warn!(manga_id = %id, user_id = %user, "Delete rejected: not owner");
            return Err(ApplicationError::forbidden(
                "Manga log belongs to another user",
            ));
        }

        self.manga_repo.delete(id).await?;

        tracing::info!(manga_id = %id, user_id = %user, "Manga log deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{record, FakeMangaRepository};
    use crate::domain::manga::{Score, ScoreFloor, Title};

    fn input(title: &str) -> MangaInput {
        MangaInput::titled(Title::new(title).unwrap())
    }

    #[tokio::test]
    async fn test_save_requires_user() {
        let handler = SaveMangaHandler::new(Arc::new(FakeMangaRepository::default()));
        let result = handler
            .handle(SaveManga {
                user: None,
                input: input("Naruto"),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_save_creates_then_updates() {
        let repo = Arc::new(FakeMangaRepository::default());
        let handler = SaveMangaHandler::new(repo.clone());
        let user = Some(UserId::new("u1"));

        let created = handler
            .handle(SaveManga {
                user: user.clone(),
                input: input("Naruto"),
            })
            .await
            .unwrap();
        assert!(created.created);
        assert_eq!(repo.len(), 1);

        let mut update = input("Naruto Shippuden");
        update.id = Some(created.record.id);
        update.score = Some(Score::new(4.0, ScoreFloor::Zero).unwrap());
        let updated = handler
            .handle(SaveManga { user, input: update })
            .await
            .unwrap();

        assert!(!updated.created);
        assert_eq!(updated.record.id, created.record.id);
        assert_eq!(updated.record.created_at, created.record.created_at);
        assert!(updated.record.updated_at >= created.record.updated_at);
        assert_eq!(updated.record.title.as_str(), "Naruto Shippuden");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_update_foreign_record_is_hidden() {
        let theirs = record("u2", "Bleach");
        let repo = Arc::new(FakeMangaRepository::with(vec![theirs.clone()]));
        let saver = ScopedMangaSaver::new(SaveMangaHandler::new(repo), Some(UserId::new("u1")));

        let mut update = input("Mine now");
        update.id = Some(theirs.id);
        assert_eq!(
            saver.save(update).await.unwrap_err(),
            SubmissionError::NotFoundOrUnauthorized
        );

        let mut missing = input("Ghost");
        missing.id = Some(MangaId::new());
        assert_eq!(
            saver.save(missing).await.unwrap_err(),
            SubmissionError::NotFoundOrUnauthorized
        );
    }

    #[tokio::test]
    async fn test_scoped_saver_without_user() {
        let saver = ScopedMangaSaver::new(
            SaveMangaHandler::new(Arc::new(FakeMangaRepository::default())),
            None,
        );
        let error = saver.save(input("Naruto")).await.unwrap_err();
        assert_eq!(error, SubmissionError::Unauthorized);
        assert_eq!(error.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_delete_checks_ownership() {
        let mine = record("u1", "Monster");
        let theirs = record("u2", "Pluto");
        let repo = Arc::new(FakeMangaRepository::with(vec![mine.clone(), theirs.clone()]));
        let handler = DeleteMangaHandler::new(repo.clone());
        let user = Some(UserId::new("u1"));

        let result = handler
            .handle(DeleteManga {
                user: user.clone(),
                manga_id: theirs.id,
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::Forbidden(_))));

        let result = handler
            .handle(DeleteManga {
                user: None,
                manga_id: mine.id,
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::Unauthorized)));

        handler
            .handle(DeleteManga {
                user,
                manga_id: mine.id,
            })
            .await
            .unwrap();
        assert_eq!(repo.len(), 1);
    }
}

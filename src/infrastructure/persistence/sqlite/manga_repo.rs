//! SQLite Manga Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{MangaRepositoryPort, RepositoryError};
use crate::domain::manga::{MangaId, MangaRecord, Score, Thumbnail, Title, UserId};

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, score, is_completed, volume_progress, \
     chapter_progress, note, thumbnail, created_at, updated_at FROM manga_logs";

/// SQLite Manga Repository
pub struct SqliteMangaRepository {
    pool: DbPool,
}

impl SqliteMangaRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MangaRow {
    id: String,
    user_id: String,
    title: String,
    score: Option<f64>,
    is_completed: bool,
    volume_progress: Option<i64>,
    chapter_progress: Option<f64>,
    note: Option<String>,
    thumbnail: Option<String>,
    created_at: String,
    updated_at: String,
}

fn corrupt(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::SerializationError(e.to_string())
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(corrupt)
}

/// 固定宽度，保证按字符串排序即按时间排序
fn format_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl TryFrom<MangaRow> for MangaRecord {
    type Error = RepositoryError;

    fn try_from(row: MangaRow) -> Result<Self, Self::Error> {
        Ok(MangaRecord {
            id: MangaId::parse(&row.id).map_err(corrupt)?,
            user_id: UserId::new(row.user_id),
            title: Title::new(row.title).map_err(corrupt)?,
            score: row.score.map(Score::from_stored),
            is_completed: row.is_completed,
            volume_progress: row
                .volume_progress
                .map(u32::try_from)
                .transpose()
                .map_err(corrupt)?,
            chapter_progress: row.chapter_progress,
            note: row.note,
            // 历史数据可能为空串
            thumbnail: row.thumbnail.and_then(|url| Thumbnail::new(url).ok()),
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl MangaRepositoryPort for SqliteMangaRepository {
    async fn save(&self, record: &MangaRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO manga_logs (id, user_id, title, score, is_completed, volume_progress,
                                    chapter_progress, note, thumbnail, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                score = excluded.score,
                is_completed = excluded.is_completed,
                volume_progress = excluded.volume_progress,
                chapter_progress = excluded.chapter_progress,
                note = excluded.note,
                thumbnail = excluded.thumbnail,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.as_str())
        .bind(record.title.as_str())
        .bind(record.score.map(|s| s.value()))
        .bind(record.is_completed)
        .bind(record.volume_progress.map(i64::from))
        .bind(record.chapter_progress)
        .bind(&record.note)
        .bind(record.thumbnail.as_ref().map(|t| t.as_str().to_string()))
        .bind(format_time(&record.created_at))
        .bind(format_time(&record.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: MangaId) -> Result<Option<MangaRecord>, RepositoryError> {
        let row: Option<MangaRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(MangaRecord::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<MangaRecord>, RepositoryError> {
        let rows: Vec<MangaRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? ORDER BY updated_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(MangaRecord::try_from).collect()
    }

    async fn delete(&self, id: MangaId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM manga_logs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manga::{MangaInput, ScoreFloor};
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn repo() -> SqliteMangaRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteMangaRepository::new(pool)
    }

    fn record(user: &str, title: &str) -> MangaRecord {
        let mut input = MangaInput::titled(Title::new(title).unwrap());
        input.score = Some(Score::new(3.5, ScoreFloor::Zero).unwrap());
        input.volume_progress = Some(4);
        input.chapter_progress = Some(41.5);
        input.note = Some("re-read arc 2".to_string());
        input.thumbnail = Some(Thumbnail::new("http://books/x.png").unwrap());
        MangaRecord::create(MangaId::new(), UserId::new(user), input)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo().await;
        let original = record("u1", "Blame!");
        repo.save(&original).await.unwrap();

        let found = repo.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(found.title.as_str(), "Blame!");
        assert_eq!(found.score.map(|s| s.value()), Some(3.5));
        assert_eq!(found.volume_progress, Some(4));
        assert_eq!(found.chapter_progress, Some(41.5));
        assert_eq!(found.thumbnail.unwrap().as_str(), "https://books/x.png");
        assert_eq!(found.created_at.timestamp_micros(), original.created_at.timestamp_micros());

        assert!(repo.find_by_id(MangaId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_long_title_row_loads_in_user_list() {
        let repo = repo().await;
        let long_title = "Kaguya-sama ".repeat(30);
        repo.save(&record("u1", &long_title)).await.unwrap();
        repo.save(&record("u1", "Blame!")).await.unwrap();

        let records = repo.find_by_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.title.as_str() == long_title.trim()));
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at() {
        let repo = repo().await;
        let mut record = record("u1", "Blame!");
        repo.save(&record).await.unwrap();

        let created_at = record.created_at;
        record.created_at = created_at + Duration::days(1);
        record.is_completed = true;
        record.score = None;
        repo.save(&record).await.unwrap();

        let found = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert!(found.is_completed);
        assert!(found.score.is_none());
        assert_eq!(found.created_at.timestamp_micros(), created_at.timestamp_micros());
    }

    #[tokio::test]
    async fn test_find_by_user_orders_by_updated() {
        let repo = repo().await;
        let mut older = record("u1", "Older");
        older.updated_at = older.updated_at - Duration::hours(1);
        let newer = record("u1", "Newer");
        let foreign = record("u2", "Foreign");
        for r in [&older, &newer, &foreign] {
            repo.save(r).await.unwrap();
        }

        let records = repo.find_by_user(&UserId::new("u1")).await.unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let record = record("u1", "Gone");
        repo.save(&record).await.unwrap();

        repo.delete(record.id).await.unwrap();
        assert!(repo.find_by_id(record.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(record.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}

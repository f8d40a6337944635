//! 测试用端口替身

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::application::ports::{MangaRepositoryPort, RepositoryError};
use crate::domain::manga::{MangaId, MangaInput, MangaRecord, Title, UserId};

/// 基于 HashMap 的仓储替身
#[derive(Default)]
pub struct FakeMangaRepository {
    records: Mutex<HashMap<MangaId, MangaRecord>>,
}

impl FakeMangaRepository {
    pub fn with(records: Vec<MangaRecord>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.records.lock().unwrap();
            for record in records {
                map.insert(record.id, record);
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MangaRepositoryPort for FakeMangaRepository {
    async fn save(&self, record: &MangaRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MangaId) -> Result<Option<MangaRecord>, RepositoryError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<MangaRecord>, RepositoryError> {
        let mut records: Vec<MangaRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn delete(&self, id: MangaId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

/// 构造测试记录
pub fn record(user: &str, title: &str) -> MangaRecord {
    MangaRecord::create(
        MangaId::new(),
        UserId::new(user),
        MangaInput::titled(Title::new(title).unwrap()),
    )
}

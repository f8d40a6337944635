//! In-Memory Form Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{FormSession, FormSessionError, FormSessionManagerPort};
use crate::domain::manga::UserId;

/// 内存表单会话管理器
pub struct InMemoryFormSessionManager {
    sessions: DashMap<String, FormSession>,
}

impl InMemoryFormSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryFormSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSessionManagerPort for InMemoryFormSessionManager {
    fn create(&self, session: FormSession) -> Result<String, FormSessionError> {
        let form_id = session.id.clone();
        if self.sessions.contains_key(&form_id) {
            return Err(FormSessionError::AlreadyExists(form_id));
        }
        let user_id = session.user_id.clone();
        self.sessions.insert(form_id.clone(), session);
        tracing::info!(form_id = %form_id, user_id = %user_id, "Form session opened");
        Ok(form_id)
    }

    fn get(&self, id: &str, user_id: &UserId) -> Result<FormSession, FormSessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| FormSessionError::NotFound(id.to_string()))?;
        if &session.user_id != user_id {
            return Err(FormSessionError::Forbidden(id.to_string()));
        }
        session.last_activity = Utc::now();
        Ok(session.clone())
    }

    fn close(&self, id: &str) -> Result<(), FormSessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::info!(form_id = %id, "Form session closed");
            })
            .ok_or_else(|| FormSessionError::NotFound(id.to_string()))
    }

    fn touch(&self, id: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.last_activity = Utc::now();
        }
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let Some(timeout) = i64::try_from(idle_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
        else {
            // 超出可表示范围，视为永不过期
            tracing::warn!(idle_timeout_secs, "Idle timeout out of range, nothing expires");
            return Vec::new();
        };
        let now = Utc::now();

        self.sessions
            .iter()
            .filter(|entry| now - entry.last_activity > timeout)
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn list_all(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::form::{FormOptions, StepFormController};
    use crate::application::ports::{
        MangaSavePort, NavigatorPort, NotificationKind, NotifierPort, SaveOutcome,
        SubmissionError,
    };
    use crate::domain::manga::MangaInput;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl MangaSavePort for Offline {
        async fn save(&self, _input: MangaInput) -> Result<SaveOutcome, SubmissionError> {
            Err(SubmissionError::Unexpected("offline".to_string()))
        }
    }

    impl NotifierPort for Offline {
        fn notify(&self, _kind: NotificationKind, _message: &str) {}
    }

    impl NavigatorPort for Offline {
        fn navigate(&self, _path: &str) {}
    }

    fn session(user: &str) -> FormSession {
        let offline = Arc::new(Offline);
        let controller = StepFormController::new(
            None,
            offline.clone(),
            offline.clone(),
            offline,
            FormOptions::default(),
        );
        FormSession::new(FormSession::generate_id(), UserId::new(user), Arc::new(controller))
    }

    #[test]
    fn test_form_session_lifecycle() {
        let manager = InMemoryFormSessionManager::new();
        let session = session("u1");
        let form_id = session.id.clone();

        manager.create(session.clone()).unwrap();
        assert!(matches!(
            manager.create(session),
            Err(FormSessionError::AlreadyExists(_))
        ));

        assert!(manager.get(&form_id, &UserId::new("u1")).is_ok());
        assert!(matches!(
            manager.get(&form_id, &UserId::new("u2")),
            Err(FormSessionError::Forbidden(_))
        ));
        assert_eq!(manager.list_all(), vec![form_id.clone()]);

        manager.close(&form_id).unwrap();
        assert!(matches!(
            manager.get(&form_id, &UserId::new("u1")),
            Err(FormSessionError::NotFound(_))
        ));
        assert!(manager.close(&form_id).is_err());
    }

    #[test]
    fn test_expired_sessions() {
        let manager = InMemoryFormSessionManager::new();
        let mut stale = session("u1");
        stale.last_activity = Utc::now() - chrono::Duration::seconds(120);
        let stale_id = manager.create(stale).unwrap();
        let fresh_id = manager.create(session("u1")).unwrap();

        assert_eq!(manager.get_expired_sessions(60), vec![stale_id.clone()]);

        manager.touch(&stale_id);
        assert!(manager.get_expired_sessions(60).is_empty());
        assert!(manager.list_all().contains(&fresh_id));
    }

    #[test]
    fn test_huge_idle_timeout_expires_nothing() {
        let manager = InMemoryFormSessionManager::new();
        let mut stale = session("u1");
        stale.last_activity = Utc::now() - chrono::Duration::days(365);
        manager.create(stale).unwrap();

        assert!(manager.get_expired_sessions(u64::MAX / 2).is_empty());
        assert!(manager.get_expired_sessions(u64::MAX).is_empty());
        assert_eq!(manager.list_all().len(), 1);
    }
}

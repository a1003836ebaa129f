use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::auth::CourseScope;
use crate::error::{Result, StatsError};
use crate::model::SessionRecord;
use crate::storage::backend::SessionStore;

/// In-process session store. Backs tests and the `memory` config backend;
/// nothing survives a restart.
///
/// Keys mirror the SQLite layout: `(partition_key, session_id)`, so scope
/// isolation holds by construction here too.
#[derive(Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<(String, Uuid), SessionRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<(String, Uuid), SessionRecord>>> {
        self.records
            .lock()
            .map_err(|e| StatsError::Storage(format!("failed to acquire store lock: {e}")))
    }
}

impl SessionStore for MemoryStore {
    async fn put(&self, record: &SessionRecord) -> Result<()> {
        let partition_key =
            CourseScope::new(record.owner_user_id, record.course_id).partition_key();
        self.lock()?
            .insert((partition_key, record.session_id), record.clone());
        Ok(())
    }

    async fn get(&self, scope: &CourseScope, session_id: Uuid) -> Result<SessionRecord> {
        self.lock()?
            .get(&(scope.partition_key(), session_id))
            .cloned()
            .ok_or_else(|| StatsError::NotFound(format!("session {session_id}")))
    }

    async fn query(&self, scope: &CourseScope) -> Result<Vec<SessionRecord>> {
        let partition_key = scope.partition_key();
        Ok(self
            .lock()?
            .iter()
            .filter(|((partition, _), _)| *partition == partition_key)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn delete(&self, scope: &CourseScope, session_id: Uuid) -> Result<()> {
        self.lock()?.remove(&(scope.partition_key(), session_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewSessionStats;

    fn record(scope: &CourseScope, modules: u64, score: f64, time: u64) -> SessionRecord {
        SessionRecord::new(
            scope,
            NewSessionStats {
                session_id: Uuid::new_v4(),
                total_modules_studied: modules,
                average_score: score,
                time_studied: time,
            },
        )
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let rec = record(&scope, 8, 85.0, 4_120_000);

        store.put(&rec).await.unwrap();
        assert_eq!(store.get(&scope, rec.session_id).await.unwrap(), rec);
    }

    #[tokio::test]
    async fn put_same_key_overwrites() {
        let store = MemoryStore::new();
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let mut rec = record(&scope, 3, 50.0, 10);

        store.put(&rec).await.unwrap();
        rec.total_modules_studied = 7;
        store.put(&rec).await.unwrap();

        let all = store.query(&scope).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].total_modules_studied, 7);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let scope = CourseScope::new(Uuid::new_v4(), Uuid::new_v4());
        let rec = record(&scope, 1, 20.0, 30);

        store.put(&rec).await.unwrap();
        store.delete(&scope, rec.session_id).await.unwrap();
        store.delete(&scope, rec.session_id).await.unwrap();
        assert!(matches!(
            store.get(&scope, rec.session_id).await.unwrap_err(),
            StatsError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn query_sees_only_its_scope() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let scope = CourseScope::new(owner, Uuid::new_v4());
        let other_course = CourseScope::new(owner, Uuid::new_v4());

        store.put(&record(&scope, 2, 30.0, 10)).await.unwrap();
        store.put(&record(&other_course, 9, 99.0, 90)).await.unwrap();

        let records = store.query(&scope).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_id, scope.course_id);
    }
}

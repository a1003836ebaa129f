mod backend;
mod memory;
mod sqlite;

pub use backend::SessionStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use uuid::Uuid;

use crate::auth::CourseScope;
use crate::config::StatsConfig;
use crate::error::{Result, StatsError};
use crate::model::SessionRecord;

/// Enum wrapper for storage backends. Dispatches to the concrete implementation.
/// Using an enum instead of `Box<dyn SessionStore>` because the trait uses RPITIT.
pub enum Storage {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl SessionStore for Storage {
    async fn put(&self, record: &SessionRecord) -> Result<()> {
        match self {
            Storage::Sqlite(s) => s.put(record).await,
            Storage::Memory(s) => s.put(record).await,
        }
    }

    async fn get(&self, scope: &CourseScope, session_id: Uuid) -> Result<SessionRecord> {
        match self {
            Storage::Sqlite(s) => s.get(scope, session_id).await,
            Storage::Memory(s) => s.get(scope, session_id).await,
        }
    }

    async fn query(&self, scope: &CourseScope) -> Result<Vec<SessionRecord>> {
        match self {
            Storage::Sqlite(s) => s.query(scope).await,
            Storage::Memory(s) => s.query(scope).await,
        }
    }

    async fn delete(&self, scope: &CourseScope, session_id: Uuid) -> Result<()> {
        match self {
            Storage::Sqlite(s) => s.delete(scope, session_id).await,
            Storage::Memory(s) => s.delete(scope, session_id).await,
        }
    }
}

/// Create a storage backend from the given configuration.
///
/// Called once at startup; the resulting handle is shared across all
/// concurrent requests rather than rebuilt per call.
pub fn create_backend(config: &StatsConfig) -> Result<Storage> {
    match config.storage.backend.as_str() {
        "sqlite" => {
            let path = match &config.storage.path {
                Some(p) => std::path::PathBuf::from(p),
                None => default_sqlite_path()?,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StatsError::Storage(format!("failed to create data dir: {e}")))?;
            }
            let store = SqliteStore::open(&path)?;
            Ok(Storage::Sqlite(store))
        }
        "memory" => Ok(Storage::Memory(MemoryStore::new())),
        other => Err(StatsError::Config(format!(
            "unknown storage backend: {other}"
        ))),
    }
}

/// Default SQLite path: `~/.config/studystats/studystats.db`
fn default_sqlite_path() -> Result<std::path::PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("studystats").join("studystats.db"))
        .ok_or_else(|| StatsError::Config("cannot determine config directory".to_string()))
}

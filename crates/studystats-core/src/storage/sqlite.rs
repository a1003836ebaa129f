use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::auth::CourseScope;
use crate::error::{Result, StatsError};
use crate::model::SessionRecord;
use crate::storage::backend::SessionStore;

/// SQLite-backed session store.
///
/// Uses a single `Connection` behind `Arc<Mutex<>>` so it can be shared
/// across async tasks. All blocking SQLite calls go through
/// [`with_conn`](Self::with_conn) which runs them on the Tokio blocking
/// thread-pool.
///
/// Rows are keyed `(partition_key, session_id)` where the partition key is
/// the owner and course ids concatenated. Scoped queries become a direct
/// partition scan and can only ever see the caller's records.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) a file-backed SQLite database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .map_err(|e| StatsError::Storage(format!("failed to open SQLite database: {e}")))?;

        Self::configure_and_init(conn, path)
    }

    /// Open an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StatsError::Storage(format!("failed to open in-memory SQLite database: {e}"))
        })?;

        Self::configure_and_init(conn, PathBuf::from(":memory:"))
    }

    /// Return the path this database was opened with (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── helpers ────────────────────────────────────────────────────────

    /// Shared initialisation: pragmas + table creation.
    fn configure_and_init(conn: Connection, path: PathBuf) -> Result<Self> {
        // WAL mode for better concurrent-read performance.
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| StatsError::Storage(format!("failed to set WAL mode: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        store.create_tables()?;
        Ok(store)
    }

    /// Create the session table and its partition index (idempotent).
    fn create_tables(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StatsError::Storage(format!("failed to acquire database lock: {e}")))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session_stats (
                partition_key TEXT NOT NULL,
                session_id TEXT NOT NULL,
                owner_user_id TEXT NOT NULL,
                course_id TEXT NOT NULL,
                total_modules_studied INTEGER NOT NULL,
                average_score REAL NOT NULL,
                time_studied INTEGER NOT NULL,
                PRIMARY KEY (partition_key, session_id)
            );
            ",
        )
        .map_err(|e| StatsError::Storage(format!("failed to create tables: {e}")))?;

        Ok(())
    }

    /// Run a blocking closure against the SQLite connection on the Tokio
    /// blocking thread-pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StatsError::Storage(format!("failed to acquire database lock: {e}")))?;
            f(&conn)
        })
        .await
        .map_err(|e| StatsError::Storage(format!("task join error: {e}")))?
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let owner: String = row.get("owner_user_id")?;
    let course: String = row.get("course_id")?;
    let session: String = row.get("session_id")?;
    let total_modules_studied: i64 = row.get("total_modules_studied")?;
    let time_studied: i64 = row.get("time_studied")?;

    Ok(SessionRecord {
        owner_user_id: parse_stored_uuid(&owner, row, "owner_user_id")?,
        course_id: parse_stored_uuid(&course, row, "course_id")?,
        session_id: parse_stored_uuid(&session, row, "session_id")?,
        total_modules_studied: total_modules_studied as u64,
        average_score: row.get("average_score")?,
        time_studied: time_studied as u64,
    })
}

fn parse_stored_uuid(raw: &str, row: &Row<'_>, column: &str) -> rusqlite::Result<Uuid> {
    let index = row.as_ref().column_index(column)?;
    Uuid::parse_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

impl SessionStore for SqliteStore {
    async fn put(&self, record: &SessionRecord) -> Result<()> {
        let record = record.clone();
        let partition_key =
            CourseScope::new(record.owner_user_id, record.course_id).partition_key();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO session_stats
                    (partition_key, session_id, owner_user_id, course_id,
                     total_modules_studied, average_score, time_studied)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (partition_key, session_id) DO UPDATE SET
                    total_modules_studied = excluded.total_modules_studied,
                    average_score = excluded.average_score,
                    time_studied = excluded.time_studied",
                params![
                    partition_key,
                    record.session_id.to_string(),
                    record.owner_user_id.to_string(),
                    record.course_id.to_string(),
                    record.total_modules_studied as i64,
                    record.average_score,
                    record.time_studied as i64,
                ],
            )
            .map_err(|e| StatsError::Storage(format!("failed to upsert session: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn get(&self, scope: &CourseScope, session_id: Uuid) -> Result<SessionRecord> {
        let partition_key = scope.partition_key();

        self.with_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT session_id, owner_user_id, course_id,
                            total_modules_studied, average_score, time_studied
                     FROM session_stats
                     WHERE partition_key = ?1 AND session_id = ?2",
                    params![partition_key, session_id.to_string()],
                    row_to_record,
                )
                .optional()
                .map_err(|e| StatsError::Storage(format!("failed to fetch session: {e}")))?;

            record.ok_or_else(|| StatsError::NotFound(format!("session {session_id}")))
        })
        .await
    }

    async fn query(&self, scope: &CourseScope) -> Result<Vec<SessionRecord>> {
        let partition_key = scope.partition_key();

        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT session_id, owner_user_id, course_id,
                            total_modules_studied, average_score, time_studied
                     FROM session_stats
                     WHERE partition_key = ?1",
                )
                .map_err(|e| StatsError::Storage(format!("failed to prepare query: {e}")))?;

            let rows = stmt
                .query_map(params![partition_key], row_to_record)
                .map_err(|e| StatsError::Storage(format!("failed to query sessions: {e}")))?;

            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| StatsError::Storage(format!("failed to read session row: {e}")))
        })
        .await
    }

    async fn delete(&self, scope: &CourseScope, session_id: Uuid) -> Result<()> {
        let partition_key = scope.partition_key();

        self.with_conn(move |conn| {
            // Affected-row count is irrelevant: deletion is idempotent.
            conn.execute(
                "DELETE FROM session_stats WHERE partition_key = ?1 AND session_id = ?2",
                params![partition_key, session_id.to_string()],
            )
            .map_err(|e| StatsError::Storage(format!("failed to delete session: {e}")))?;
            Ok(())
        })
        .await
    }
}

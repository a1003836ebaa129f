use uuid::Uuid;

use crate::auth::CourseScope;
use crate::error::Result;
use crate::model::SessionRecord;

/// Abstract session store. SQLite is the primary implementation; the
/// in-memory backend serves tests and ephemeral deployments.
///
/// All operations are scoped: a [`CourseScope`] names the partition, so a
/// backend can never hand back a record belonging to another owner or
/// course.
pub trait SessionStore: Send + Sync {
    /// Upsert by identity key `(owner, course, session)`. Last writer wins.
    fn put(&self, record: &SessionRecord) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Fetch one record, or `StatsError::NotFound`.
    fn get(
        &self,
        scope: &CourseScope,
        session_id: Uuid,
    ) -> impl std::future::Future<Output = Result<SessionRecord>> + Send;

    /// All records in the scope, order irrelevant. Each call re-queries.
    fn query(
        &self,
        scope: &CourseScope,
    ) -> impl std::future::Future<Output = Result<Vec<SessionRecord>>> + Send;

    /// Remove the record if present. Deleting an absent key is not an error.
    fn delete(
        &self,
        scope: &CourseScope,
        session_id: Uuid,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

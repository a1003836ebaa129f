use uuid::Uuid;

use crate::error::{Result, StatsError};
use crate::model::SessionRecord;

/// An authenticated owner paired with the course they are addressing.
///
/// Every store operation goes through a scope, so a lookup can only ever
/// see the caller's own records for the course named in the request. The
/// guard is structural: there is no post-read ownership check on the happy
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseScope {
    pub owner_user_id: Uuid,
    pub course_id: Uuid,
}

impl CourseScope {
    pub fn new(owner_user_id: Uuid, course_id: Uuid) -> Self {
        Self {
            owner_user_id,
            course_id,
        }
    }

    /// Composite partition key: owner id and course id concatenated.
    /// Session ids act as the sort key within a partition.
    pub fn partition_key(&self) -> String {
        format!("{}{}", self.owner_user_id, self.course_id)
    }

    /// Explicit post-read ownership check, for table layouts where the
    /// course is a plain attribute rather than part of the key. With the
    /// composite partition key this never fires, since the store cannot
    /// return a record from another scope.
    pub fn ensure_owns(&self, record: &SessionRecord) -> Result<()> {
        if record.owner_user_id != self.owner_user_id || record.course_id != self.course_id {
            return Err(StatsError::OwnershipMismatch(format!(
                "session {} does not belong to owner {} in course {}",
                record.session_id, self.owner_user_id, self.course_id
            )));
        }
        Ok(())
    }
}

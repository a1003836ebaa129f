use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CourseScope;

/// One recorded study session. The identity key is
/// `(owner_user_id, course_id, session_id)`; writing the same key again
/// overwrites in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub owner_user_id: Uuid,
    pub course_id: Uuid,
    pub session_id: Uuid,
    pub total_modules_studied: u64,
    pub average_score: f64,
    pub time_studied: u64,
}

impl SessionRecord {
    pub fn new(scope: &CourseScope, stats: NewSessionStats) -> Self {
        Self {
            owner_user_id: scope.owner_user_id,
            course_id: scope.course_id,
            session_id: stats.session_id,
            total_modules_studied: stats.total_modules_studied,
            average_score: stats.average_score,
            time_studied: stats.time_studied,
        }
    }
}

/// Validated write input, produced by [`crate::validate::session_stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionStats {
    pub session_id: Uuid,
    pub total_modules_studied: u64,
    pub average_score: f64,
    pub time_studied: u64,
}

/// Single-session read body. Internal key fields (owner, course) are
/// deliberately absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_id: Uuid,
    pub total_modules_studied: u64,
    pub average_score: f64,
    pub time_studied: u64,
}

impl From<SessionRecord> for SessionStats {
    fn from(record: SessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            total_modules_studied: record.total_modules_studied,
            average_score: record.average_score,
            time_studied: record.time_studied,
        }
    }
}

/// Course-level aggregate over all of one owner's sessions for a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub time_studied: u64,
    pub total_modules_studied: u64,
    pub average_score: f64,
}

impl CourseStats {
    pub fn zero() -> Self {
        Self {
            time_studied: 0,
            total_modules_studied: 0,
            average_score: 0.0,
        }
    }
}

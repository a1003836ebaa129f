use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, StatsError};
use crate::model::NewSessionStats;

/// Normalize a raw identifier and parse it as a UUID v4.
fn parse_uuid_v4(raw: &str) -> Option<Uuid> {
    let normalized = raw.trim().to_lowercase();
    let id = Uuid::parse_str(&normalized).ok()?;
    (id.get_version_num() == 4).then_some(id)
}

/// Validate the caller identity. A missing or malformed owner id means the
/// request is unauthenticated, before any course or session context is
/// considered.
pub fn owner_id(raw: &str) -> Result<Uuid> {
    parse_uuid_v4(raw)
        .ok_or_else(|| StatsError::Unauthenticated("owner id is not a valid UUID v4".into()))
}

/// Validate a course id taken from the request path.
pub fn course_id(raw: &str) -> Result<Uuid> {
    parse_uuid_v4(raw)
        .ok_or_else(|| StatsError::InvalidInput(format!("course id '{}' is not a UUID v4", raw.trim())))
}

/// Validate a session id taken from the request path.
pub fn session_id(raw: &str) -> Result<Uuid> {
    parse_uuid_v4(raw)
        .ok_or_else(|| StatsError::InvalidInput(format!("session id '{}' is not a UUID v4", raw.trim())))
}

/// Validate a write payload. The body must be a JSON object carrying a
/// `sessionId` UUID v4, non-negative integer `totalModulesStudied` and
/// `timeStudied`, and a finite `averageScore`. Any violation rejects the
/// whole payload; nothing is partially accepted.
pub fn session_stats(body: &Value) -> Result<NewSessionStats> {
    let obj = body
        .as_object()
        .ok_or_else(|| StatsError::InvalidInput("payload must be a JSON object".into()))?;

    let session_id = obj
        .get("sessionId")
        .and_then(Value::as_str)
        .and_then(parse_uuid_v4)
        .ok_or_else(|| StatsError::InvalidInput("sessionId must be a UUID v4".into()))?;

    let total_modules_studied = non_negative_integer(obj.get("totalModulesStudied"))
        .ok_or_else(|| {
            StatsError::InvalidInput("totalModulesStudied must be a non-negative integer".into())
        })?;

    let time_studied = non_negative_integer(obj.get("timeStudied")).ok_or_else(|| {
        StatsError::InvalidInput("timeStudied must be a non-negative integer".into())
    })?;

    let average_score = obj
        .get("averageScore")
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite())
        .ok_or_else(|| StatsError::InvalidInput("averageScore must be a finite number".into()))?;

    Ok(NewSessionStats {
        session_id,
        total_modules_studied,
        average_score,
        time_studied,
    })
}

/// `as_u64` already refuses negatives and fractional values.
fn non_negative_integer(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64)
}

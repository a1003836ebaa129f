use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use studystats_core::auth::CourseScope;
use studystats_core::model::{CourseStats, SessionRecord, SessionStats};
use studystats_core::storage::SessionStore;
use studystats_core::{aggregate, validate};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the authenticated caller's id.
const USER_ID_HEADER: &str = "x-user-id";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/courses/{course_id}",
            get(get_course_stats).post(add_session_stats),
        )
        .route(
            "/courses/{course_id}/sessions/{session_id}",
            get(get_session_stats).delete(delete_session_stats),
        )
}

// -- Helpers --

/// Authenticate the caller. A missing header reads as an empty id and fails
/// the same way a malformed one does.
fn authenticate(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    Ok(validate::owner_id(raw)?)
}

/// Authentication before path validation: a bad owner id is 401 even when
/// the course id is also malformed.
fn course_scope(headers: &HeaderMap, course_id: &str) -> Result<CourseScope, ApiError> {
    let owner = authenticate(headers)?;
    let course = validate::course_id(course_id)?;
    Ok(CourseScope::new(owner, course))
}

// -- Handlers --

async fn get_course_stats(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CourseStats>, ApiError> {
    let scope = course_scope(&headers, &course_id)?;
    let records = state.store.query(&scope).await?;
    Ok(Json(aggregate::course_stats(records)))
}

async fn get_session_stats(
    State(state): State<Arc<AppState>>,
    Path((course_id, session_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<SessionStats>, ApiError> {
    let scope = course_scope(&headers, &course_id)?;
    let session = validate::session_id(&session_id)?;
    let record = state.store.get(&scope, session).await?;
    Ok(Json(SessionStats::from(record)))
}

async fn add_session_stats(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let scope = course_scope(&headers, &course_id)?;
    let stats = validate::session_stats(&body)?;
    let record = SessionRecord::new(&scope, stats);
    state.store.put(&record).await?;
    Ok(StatusCode::CREATED)
}

async fn delete_session_stats(
    State(state): State<Arc<AppState>>,
    Path((course_id, session_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let scope = course_scope(&headers, &course_id)?;
    let session = validate::session_id(&session_id)?;
    state.store.delete(&scope, session).await?;
    Ok(StatusCode::OK)
}

// crates/server/src/routes/history.rs
//! Watch-history endpoints: the write path that feeds the calendar, and
//! a recent-activity listing. Both require the persistent store; in
//! ephemeral deployments they answer 503 while the calendar keeps
//! serving empty months.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use watchdeck_core::{MediaType, WatchSession};
use watchdeck_db::NewWatchSession;

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body for POST /api/history.
#[derive(Debug, Deserialize)]
pub struct RecordSessionRequest {
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Defaults to the current UTC time when absent.
    #[serde(default)]
    pub watched_at: Option<DateTime<Utc>>,
}

/// Response for POST /api/history.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct RecordSessionResponse {
    pub id: i64,
}

/// Query parameters for GET /api/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of sessions to return (default: 20, max: 100)
    pub limit: Option<i64>,
}

/// One entry in the recent-history listing.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub watched_at: Option<DateTime<Utc>>,
}

impl From<WatchSession> for HistoryEntry {
    fn from(row: WatchSession) -> Self {
        Self {
            media_id: row.media_id,
            media_type: row.media_type,
            title: row.title,
            poster_path: row.poster_path,
            watched_at: row.watched_at,
        }
    }
}

/// POST /api/history - Record a watch session for the caller.
pub async fn record_session(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(body): Json<RecordSessionRequest>,
) -> ApiResult<(StatusCode, Json<RecordSessionResponse>)> {
    let Some(db) = &state.db else {
        return Err(ApiError::HistoryUnavailable);
    };

    let id = db
        .record_watch_session(
            &identity.user_id,
            &NewWatchSession {
                media_id: body.media_id,
                media_type: body.media_type,
                title: body.title,
                poster_path: body.poster_path,
                watched_at: body.watched_at,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RecordSessionResponse { id })))
}

/// GET /api/history - Recent watch sessions for the caller, newest first.
pub async fn recent_history(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let Some(db) = &state.db else {
        return Err(ApiError::HistoryUnavailable);
    };

    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let rows = db.recent_watch_sessions(&identity.user_id, limit).await?;

    Ok(Json(rows.into_iter().map(HistoryEntry::from).collect()))
}

/// Create the history routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(recent_history).post(record_session))
}

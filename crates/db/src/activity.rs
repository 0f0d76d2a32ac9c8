// crates/db/src/activity.rs
//! Watch-session queries: the read path the calendar aggregator consumes
//! and the write path the history endpoint records through.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use watchdeck_core::{ActivityStore, MediaType, StoreError, WatchSession};

use crate::{Database, DbResult};

/// Input for recording a new watch session.
#[derive(Debug, Clone)]
pub struct NewWatchSession {
    pub media_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    /// Defaults to the current UTC time when absent.
    pub watched_at: Option<DateTime<Utc>>,
}

impl Database {
    /// Fetch every watch session for `user_id` whose UTC civil date falls
    /// within `[first, last]` inclusive, oldest first.
    ///
    /// Rows without a timestamp are excluded here; they cannot be placed
    /// on any calendar day. Rows whose media_type column no longer parses
    /// are skipped with a warning rather than failing the whole fetch.
    pub async fn fetch_watch_sessions(
        &self,
        user_id: &str,
        first: NaiveDate,
        last: NaiveDate,
    ) -> DbResult<Vec<WatchSession>> {
        let rows: Vec<(Option<i64>, i64, String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT watched_at, media_id, media_type, title, poster_path
            FROM watch_sessions
            WHERE user_id = ?1
              AND watched_at IS NOT NULL
              AND date(watched_at, 'unixepoch') >= ?2
              AND date(watched_at, 'unixepoch') <= ?3
            ORDER BY watched_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(first.to_string())
        .bind(last.to_string())
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(watched_at, media_id, media_type, title, poster_path)| {
                let Some(media_type) = MediaType::parse_str(&media_type) else {
                    tracing::warn!(media_id, media_type = %media_type, "skipping row with unknown media type");
                    return None;
                };
                Some(WatchSession {
                    user_id: user_id.to_string(),
                    watched_at: watched_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
                    media_id,
                    media_type,
                    title,
                    poster_path,
                })
            })
            .collect())
    }

    /// Record a watch session for a user. Returns the new row id.
    pub async fn record_watch_session(
        &self,
        user_id: &str,
        session: &NewWatchSession,
    ) -> DbResult<i64> {
        let watched_at = session.watched_at.unwrap_or_else(Utc::now);
        let result = sqlx::query(
            r#"
            INSERT INTO watch_sessions (user_id, media_id, media_type, title, poster_path, watched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(user_id)
        .bind(session.media_id)
        .bind(session.media_type.as_str())
        .bind(&session.title)
        .bind(&session.poster_path)
        .bind(watched_at.timestamp())
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent watch sessions for a user, newest first. Rows without
    /// a timestamp sort last.
    pub async fn recent_watch_sessions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> DbResult<Vec<WatchSession>> {
        let rows: Vec<(Option<i64>, i64, String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT watched_at, media_id, media_type, title, poster_path
            FROM watch_sessions
            WHERE user_id = ?1
            ORDER BY watched_at IS NULL, watched_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(watched_at, media_id, media_type, title, poster_path)| {
                let media_type = MediaType::parse_str(&media_type)?;
                Some(WatchSession {
                    user_id: user_id.to_string(),
                    watched_at: watched_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
                    media_id,
                    media_type,
                    title,
                    poster_path,
                })
            })
            .collect())
    }
}

/// Store-backed mode: the database is the activity store. sqlx detail
/// stays on this side of the seam; the aggregator only sees
/// `StoreError::Unavailable`.
#[async_trait]
impl ActivityStore for Database {
    async fn fetch_sessions(
        &self,
        user_id: &str,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<WatchSession>, StoreError> {
        self.fetch_watch_sessions(user_id, first, last)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "watch session fetch failed");
                StoreError::unavailable(e.to_string())
            })
    }
}

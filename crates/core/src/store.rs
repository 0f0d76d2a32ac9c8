// crates/core/src/store.rs
//! The activity-store capability seam.
//!
//! The aggregator never decides whether a persistent store exists; the
//! deployment wires in either a real store (the db crate's `Database`)
//! or [`NoStore`], and both run the same densification code path.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::WatchSession;

/// Errors surfaced by an activity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store failed or timed out. Never silently converted to an
    /// empty result; callers see the failure and decide.
    #[error("activity store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Read-only access to raw watch sessions.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Fetch every session for `user_id` whose UTC civil date falls
    /// within `[first, last]` inclusive. Rows without a usable timestamp
    /// may be omitted; the aggregator skips them anyway.
    async fn fetch_sessions(
        &self,
        user_id: &str,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<WatchSession>, StoreError>;
}

/// Store implementation for deployments with no persistence configured.
/// Always returns an empty row set, so the calendar comes back dense and
/// empty rather than failing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStore;

#[async_trait]
impl ActivityStore for NoStore {
    async fn fetch_sessions(
        &self,
        _user_id: &str,
        _first: NaiveDate,
        _last: NaiveDate,
    ) -> Result<Vec<WatchSession>, StoreError> {
        Ok(Vec::new())
    }
}

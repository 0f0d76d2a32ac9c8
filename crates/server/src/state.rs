// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use watchdeck_core::{ActivityStore, NoStore};
use watchdeck_db::Database;

use crate::auth::{IdentityResolver, StaticIdentity};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Activity store the calendar aggregator reads from. Either the
    /// database or [`NoStore`], decided at startup, never per request.
    pub store: Arc<dyn ActivityStore>,
    /// Bearer-token identity resolver.
    pub identity: Arc<dyn IdentityResolver>,
    /// Database handle for the history write path. `None` in ephemeral
    /// deployments.
    pub db: Option<Database>,
}

impl AppState {
    /// Assemble state from explicit parts (used by tests and by the
    /// mode-specific constructors below).
    pub fn new(
        store: Arc<dyn ActivityStore>,
        identity: Arc<dyn IdentityResolver>,
        db: Option<Database>,
    ) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            store,
            identity,
            db,
        })
    }

    /// Store-backed mode: the database serves both the activity store
    /// and identity resolution.
    pub fn with_database(db: Database) -> Arc<Self> {
        Self::new(Arc::new(db.clone()), Arc::new(db.clone()), Some(db))
    }

    /// Ephemeral mode: no persistence, one fixed token. The calendar
    /// endpoint still serves fully dense (empty) months.
    pub fn ephemeral(token: impl Into<String>, user_id: impl Into<String>) -> Arc<Self> {
        Self::new(
            Arc::new(NoStore),
            Arc::new(StaticIdentity::new(token, user_id)),
            None,
        )
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

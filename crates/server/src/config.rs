// crates/server/src/config.rs
//! Environment-variable configuration.
//!
//! - `WATCHDECK_PORT` (or `PORT`): listen port.
//! - `WATCHDECK_DB`: database file path; defaults to the per-user data
//!   directory when unset.
//! - `WATCHDECK_EPHEMERAL`: set to `1`/`true` to run with no persistent
//!   store at all.
//! - `WATCHDECK_TOKEN`: bearer token accepted in ephemeral mode, or
//!   seeded into the token table at startup in store-backed mode.

use std::path::PathBuf;

/// Default port for the server.
pub const DEFAULT_PORT: u16 = 47810;

/// Token and user id used when none are configured. Ephemeral
/// deployments are single-user and local, so a well-known default keeps
/// offline setup to zero steps.
pub const DEFAULT_LOCAL_TOKEN: &str = "local-dev";
pub const DEFAULT_LOCAL_USER: &str = "local";

/// Whether a persistent store is configured for this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// SQLite-backed; `None` path means the default location.
    Database { path: Option<PathBuf> },
    /// No store at all; calendars are served dense and empty.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub mode: StoreMode,
    pub token: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("WATCHDECK_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok()),
            std::env::var("WATCHDECK_DB").ok(),
            std::env::var("WATCHDECK_EPHEMERAL").ok(),
            std::env::var("WATCHDECK_TOKEN").ok(),
        )
    }

    /// Pure assembly from raw variable values, so mode selection is
    /// testable without touching the process environment.
    fn from_values(
        port: Option<String>,
        db_path: Option<String>,
        ephemeral: Option<String>,
        token: Option<String>,
    ) -> Self {
        let port = port
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let ephemeral = matches!(ephemeral.as_deref(), Some("1") | Some("true"));
        let mode = if ephemeral {
            StoreMode::Ephemeral
        } else {
            StoreMode::Database {
                path: db_path.map(PathBuf::from),
            }
        };

        Self {
            port,
            mode,
            token: token.unwrap_or_else(|| DEFAULT_LOCAL_TOKEN.to_string()),
        }
    }
}

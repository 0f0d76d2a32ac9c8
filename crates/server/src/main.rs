// crates/server/src/main.rs
//! Watchdeck server binary.
//!
//! Opens the configured store (or none, in ephemeral mode), provisions
//! the local identity, and serves the HTTP API.

use std::net::SocketAddr;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use watchdeck_db::Database;
use watchdeck_server::{
    config::DEFAULT_LOCAL_USER, create_app, AppState, ServerConfig, StoreMode,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::from_env();

    // Print banner
    eprintln!("\n\u{1f3ac} watchdeck v{}\n", env!("CARGO_PKG_VERSION"));

    // Assemble state for the configured deployment mode
    let state = match &config.mode {
        StoreMode::Database { path } => {
            let db = match path {
                Some(path) => Database::new(path).await?,
                None => Database::open_default().await?,
            };
            // First-run provisioning: make the configured token usable
            // without a separate setup step.
            db.ensure_local_identity(&config.token, DEFAULT_LOCAL_USER)
                .await?;
            eprintln!("  \u{2713} Store: {}", db.db_path().display());
            AppState::with_database(db)
        }
        StoreMode::Ephemeral => {
            eprintln!("  \u{2713} Store: none (ephemeral mode)");
            AppState::ephemeral(config.token.clone(), DEFAULT_LOCAL_USER)
        }
    };

    // Bind and serve
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    eprintln!("  \u{2192} http://localhost:{}\n", config.port);
    tracing::info!(port = config.port, "watchdeck server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

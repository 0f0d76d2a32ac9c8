// crates/db/src/migrations.rs
/// Inline SQL migrations for the watchdeck database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.
pub const MIGRATIONS: &[&str] = &[
    // Migration 1: users table
    r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL
);
"#,
    // Migration 2: api_tokens table (opaque bearer token -> user)
    r#"
CREATE TABLE IF NOT EXISTS api_tokens (
    token TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    created_at INTEGER NOT NULL
);
"#,
    // Migration 3: watch_sessions table.
    // watched_at is a unix timestamp and is nullable: legacy imports can
    // carry rows with no usable timestamp, and those never appear on a
    // calendar.
    r#"
CREATE TABLE IF NOT EXISTS watch_sessions (
    id INTEGER PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    media_id INTEGER NOT NULL,
    media_type TEXT NOT NULL,
    title TEXT NOT NULL,
    poster_path TEXT,
    watched_at INTEGER
);
"#,
    // Migration 4: watch_sessions indexes
    r#"
CREATE INDEX IF NOT EXISTS idx_watch_sessions_user_date ON watch_sessions(user_id, watched_at);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_api_tokens_user ON api_tokens(user_id);
"#,
];

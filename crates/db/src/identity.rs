// crates/db/src/identity.rs
//! User and API-token queries backing bearer-token identity resolution.

use chrono::Utc;

use crate::{Database, DbResult};

impl Database {
    /// Create a user if it does not already exist.
    pub async fn create_user(&self, id: &str, display_name: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO users (id, display_name, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(display_name)
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Issue an opaque bearer token for a user. Re-issuing the same token
    /// string is a no-op.
    pub async fn issue_token(&self, token: &str, user_id: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO api_tokens (token, user_id, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(token) DO NOTHING",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Resolve a bearer token to its user id, or `None` for unknown tokens.
    pub async fn resolve_token(&self, token: &str) -> DbResult<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM api_tokens WHERE token = ?1")
                .bind(token)
                .fetch_optional(self.pool())
                .await?;
        Ok(row.map(|(user_id,)| user_id))
    }

    /// Ensure a local user exists and the given token resolves to it.
    /// Used at startup so a fresh store-backed deployment is usable
    /// without a separate provisioning step.
    pub async fn ensure_local_identity(&self, token: &str, user_id: &str) -> DbResult<()> {
        self.create_user(user_id, "Local User").await?;
        self.issue_token(token, user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_round_trip() {
        let db = Database::new_in_memory().await.expect("in-memory DB");
        db.create_user("user-1", "Test User").await.unwrap();
        db.issue_token("tok-abc", "user-1").await.unwrap();

        assert_eq!(
            db.resolve_token("tok-abc").await.unwrap(),
            Some("user-1".to_string())
        );
        assert_eq!(db.resolve_token("tok-unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_local_identity_idempotent() {
        let db = Database::new_in_memory().await.expect("in-memory DB");
        db.ensure_local_identity("tok-local", "local").await.unwrap();
        db.ensure_local_identity("tok-local", "local").await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM api_tokens")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 1);
        assert_eq!(
            db.resolve_token("tok-local").await.unwrap(),
            Some("local".to_string())
        );
    }
}

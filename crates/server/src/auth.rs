// crates/server/src/auth.rs
//! Bearer-token identity resolution.
//!
//! Identity is resolved before any handler logic runs: the [`Identity`]
//! extractor rejects the request with 401 when the token is missing or
//! unknown, so the calendar aggregator is never invoked for an
//! unauthenticated caller.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use watchdeck_core::StoreError;
use watchdeck_db::Database;

use crate::error::ApiError;
use crate::state::AppState;

/// Maps an opaque bearer token to a user id.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` means the token is unknown (a 401, not a 500).
    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError>;
}

/// Store-backed resolution against the api_tokens table.
#[async_trait]
impl IdentityResolver for Database {
    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        self.resolve_token(token)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

/// Single fixed token for ephemeral deployments with no user database.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    token: String,
    user_id: String,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        if token == self.token {
            Ok(Some(self.user_id.clone()))
        } else {
            Ok(None)
        }
    }
}

/// The authenticated caller, extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        match state.identity.resolve(token).await? {
            Some(user_id) => Ok(Identity { user_id }),
            None => Err(ApiError::Unauthenticated),
        }
    }
}

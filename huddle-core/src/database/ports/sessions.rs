use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::users::auth::AuthSession;
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionsRepository: Send + Sync {
    async fn create_session(&self, session: &AuthSession) -> Result<()>;
    async fn find_by_access_hash(&self, hash: &str) -> Result<Option<AuthSession>>;
    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<AuthSession>>;
    /// Swap both token digests of a live session.
    async fn rotate_tokens(&self, rotated: &AuthSession) -> Result<()>;
    async fn revoke_session(&self, session_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    async fn revoke_user_sessions(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64>;
    /// Delete sessions whose refresh window has passed or that were revoked.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

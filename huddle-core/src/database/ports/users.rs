use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::users::{Profile, User};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert the account and its first profile atomically.
    async fn create_user_with_profile(
        &self,
        user: &User,
        password_hash: &str,
        profile: &Profile,
    ) -> Result<()>;
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
    /// `email` must already be normalized to lower case.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>>;
    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;
    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()>;
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;
}

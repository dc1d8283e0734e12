use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::Profile;
use crate::error::Result;

#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    async fn create_profile(&self, profile: &Profile) -> Result<()>;
    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>>;
    async fn list_profiles_for_user(&self, user_id: Uuid) -> Result<Vec<Profile>>;
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::pools::TeamSelection;
use crate::error::Result;

#[async_trait]
pub trait SelectionsRepository: Send + Sync {
    /// Replace an entry's draft and mark it complete, atomically.
    async fn replace_selections(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
        selections: &[TeamSelection],
    ) -> Result<()>;
    /// Remove an entry's draft and mark it incomplete, atomically.
    async fn clear_selections(&self, pool_id: Uuid, profile_id: Uuid) -> Result<()>;
    /// Ordered by `selection_order`.
    async fn list_for_entry(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Vec<TeamSelection>>;
    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<TeamSelection>>;
    async fn count_for_profile(&self, profile_id: Uuid) -> Result<i64>;
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::pools::{Pool, PoolParticipant};
use crate::error::Result;

/// A participant row joined with its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub participant: PoolParticipant,
    pub display_name: String,
    pub user_id: Uuid,
}

#[async_trait]
pub trait PoolsRepository: Send + Sync {
    /// Insert the pool and enroll its creator in one transaction.
    async fn create_pool(&self, pool: &Pool, creator: &PoolParticipant) -> Result<()>;
    async fn get_pool(&self, pool_id: Uuid) -> Result<Option<Pool>>;
    async fn list_active_pools(&self) -> Result<Vec<Pool>>;
    async fn list_pools_for_season(&self, season_year: i32) -> Result<Vec<Pool>>;
    /// Cascades to participants, selections and scores.
    async fn delete_pool(&self, pool_id: Uuid) -> Result<()>;
    /// Enroll a profile unless the pool already holds `max_participants`.
    async fn add_participant(&self, participant: &PoolParticipant) -> Result<()>;
    async fn get_participant(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Option<PoolParticipant>>;
    /// Participants ordered by join time.
    async fn list_entries(&self, pool_id: Uuid) -> Result<Vec<PoolEntry>>;
    async fn list_memberships(&self, profile_id: Uuid) -> Result<Vec<PoolParticipant>>;
    async fn count_participants(&self, pool_id: Uuid) -> Result<i64>;
}

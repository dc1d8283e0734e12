use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::pools::PoolScore;
use crate::error::Result;

#[async_trait]
pub trait ScoresRepository: Send + Sync {
    /// Replace every score row of a pool with `scores`.
    async fn replace_pool_scores(&self, pool_id: Uuid, scores: &[PoolScore]) -> Result<()>;
    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<PoolScore>>;
    async fn list_for_entry(&self, pool_id: Uuid, profile_id: Uuid) -> Result<Vec<PoolScore>>;
}

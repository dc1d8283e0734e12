use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Empty every application table, children before parents.
    async fn reset_all(&self) -> Result<()>;
}

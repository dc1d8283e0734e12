use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership of a profile in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParticipant {
    pub participant_id: Uuid,
    pub pool_id: Uuid,
    pub profile_id: Uuid,
    pub selections_complete: bool,
    pub joined_at: DateTime<Utc>,
}

impl PoolParticipant {
    pub fn new(pool_id: Uuid, profile_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            participant_id: Uuid::now_v7(),
            pool_id,
            profile_id,
            selections_complete: false,
            joined_at: now,
        }
    }
}

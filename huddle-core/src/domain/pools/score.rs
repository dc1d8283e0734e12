use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Points of one entry for one week, plus the running total and rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolScore {
    pub score_id: Uuid,
    pub pool_id: Uuid,
    pub profile_id: Uuid,
    pub week_id: Uuid,
    pub points_earned: i32,
    pub total_points: i32,
    pub rank_position: Option<i32>,
    pub calculated_at: DateTime<Utc>,
}

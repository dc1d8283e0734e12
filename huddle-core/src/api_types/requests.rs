use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPoolRequest {
    pub profile_id: Uuid,
}

/// Teams in pick order; position 0 becomes `selection_order` 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSelectionsRequest {
    pub team_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameResultRequest {
    pub home_score: i32,
    pub away_score: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamReportQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TeamReportQuery {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, 32)
    }
}

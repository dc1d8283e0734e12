//! Process-local adapter implementing every repository port.
//!
//! Enforces the same uniqueness rules and cascades as the PostgreSQL schema
//! so services behave identically in tests and local development.

mod repositories;

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::infrastructure::postgres::conflict_message;
use crate::domain::nfl::{Game, Season, Team, TeamPerformance, Week};
use crate::domain::pools::{Pool, PoolParticipant, PoolScore, TeamSelection};
use crate::domain::users::auth::AuthSession;
use crate::domain::users::{Profile, User};
use crate::error::HuddleError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, StoredUser>,
    sessions: HashMap<Uuid, AuthSession>,
    profiles: HashMap<Uuid, Profile>,
    teams: HashMap<Uuid, Team>,
    seasons: HashMap<Uuid, Season>,
    weeks: HashMap<Uuid, Week>,
    games: HashMap<Uuid, Game>,
    performance: HashMap<(Uuid, Uuid), TeamPerformance>,
    pools: HashMap<Uuid, Pool>,
    participants: Vec<PoolParticipant>,
    selections: Vec<TeamSelection>,
    scores: Vec<PoolScore>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

impl Tables {
    fn remove_profiles(&mut self, doomed: &[Uuid]) {
        self.profiles.retain(|id, _| !doomed.contains(id));
        self.participants.retain(|p| !doomed.contains(&p.profile_id));
        self.selections.retain(|s| !doomed.contains(&s.profile_id));
        self.scores.retain(|s| !doomed.contains(&s.profile_id));
    }

    fn remove_pool(&mut self, pool_id: Uuid) -> bool {
        let existed = self.pools.remove(&pool_id).is_some();
        self.participants.retain(|p| p.pool_id != pool_id);
        self.selections.retain(|s| s.pool_id != pool_id);
        self.scores.retain(|s| s.pool_id != pool_id);
        existed
    }

    fn week_number(&self, week_id: Uuid) -> i32 {
        self.weeks
            .get(&week_id)
            .map(|w| w.week_number)
            .unwrap_or(i32::MAX)
    }
}

fn conflict(constraint: &str) -> HuddleError {
    HuddleError::Conflict(
        conflict_message(constraint)
            .unwrap_or("Duplicate record")
            .to_string(),
    )
}

fn not_found(what: &str) -> HuddleError {
    HuddleError::NotFound(format!("{what} not found"))
}

/// Shared in-memory store. Clone the `Arc` around it to share state.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

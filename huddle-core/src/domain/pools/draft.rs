use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::validation::ValidationError;

/// Teams each profile drafts per pool.
pub const DRAFT_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSelection {
    pub selection_id: Uuid,
    pub pool_id: Uuid,
    pub profile_id: Uuid,
    pub team_id: Uuid,
    pub selection_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A complete, duplicate-free draft in pick order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPicks(Vec<Uuid>);

impl DraftPicks {
    pub fn new(team_ids: Vec<Uuid>) -> Result<Self, ValidationError> {
        if team_ids.len() != DRAFT_SIZE {
            return Err(ValidationError::DraftSize {
                expected: DRAFT_SIZE,
                actual: team_ids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(DRAFT_SIZE);
        if !team_ids.iter().all(|id| seen.insert(*id)) {
            return Err(ValidationError::DuplicateTeam);
        }
        Ok(Self(team_ids))
    }

    pub fn team_ids(&self) -> &[Uuid] {
        &self.0
    }

    /// Selection rows with `selection_order` 1..=4 following pick order.
    pub fn to_selections(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Vec<TeamSelection> {
        self.0
            .iter()
            .zip(1..)
            .map(|(team_id, order)| TeamSelection {
                selection_id: Uuid::now_v7(),
                pool_id,
                profile_id,
                team_id: *team_id,
                selection_order: order,
                created_at: now,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u128) -> Vec<Uuid> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    #[test]
    fn exactly_four_required() {
        assert_eq!(
            DraftPicks::new(ids(3)),
            Err(ValidationError::DraftSize {
                expected: 4,
                actual: 3
            })
        );
        assert!(DraftPicks::new(ids(5)).is_err());
        assert!(DraftPicks::new(ids(4)).is_ok());
    }

    #[test]
    fn duplicates_rejected() {
        let mut picks = ids(3);
        picks.push(picks[0]);
        assert_eq!(DraftPicks::new(picks), Err(ValidationError::DuplicateTeam));
    }

    #[test]
    fn selections_are_numbered_in_pick_order() {
        let picks = DraftPicks::new(ids(4)).unwrap();
        let rows = picks.to_selections(Uuid::now_v7(), Uuid::now_v7(), Utc::now());
        let orders: Vec<_> = rows.iter().map(|r| r.selection_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert_eq!(rows[2].team_id, Uuid::from_u128(3));
    }
}

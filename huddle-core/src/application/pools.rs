use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::application::draft::{SelectedTeam, describe_selections, team_index};
use crate::application::profiles::owned_profile;
use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::pools::{CreatePoolRequest, Pool, PoolParticipant};
use crate::error::{HuddleError, Result};

/// A pool with its occupancy, as listed for joining.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSummary {
    #[serde(flatten)]
    pub pool: Pool,
    pub participant_count: i64,
    pub is_full: bool,
    pub registration_open: bool,
}

impl PoolSummary {
    fn new(pool: Pool, participant_count: i64, now: DateTime<Utc>) -> Self {
        Self {
            is_full: !pool.has_room(participant_count),
            registration_open: pool.registration_open(now),
            pool,
            participant_count,
        }
    }
}

/// One of a profile's pool memberships with its draft.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    #[serde(flatten)]
    pub pool: Pool,
    pub selections_complete: bool,
    pub joined_at: DateTime<Utc>,
    pub selections: Vec<SelectedTeam>,
    pub draft_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub profile_id: Uuid,
    pub display_name: String,
    pub selections_complete: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolDetail {
    #[serde(flatten)]
    pub summary: PoolSummary,
    pub participants: Vec<ParticipantView>,
}

#[derive(Debug, Clone)]
pub struct PoolService {
    uow: Arc<AppUnitOfWork>,
}

impl PoolService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    /// Create a pool and enroll the creating profile.
    pub async fn create_pool(
        &self,
        user_id: Uuid,
        request: CreatePoolRequest,
        now: DateTime<Utc>,
    ) -> Result<PoolSummary> {
        let profile = owned_profile(&self.uow, user_id, request.profile_id).await?;
        let pool = request.into_pool(user_id, now)?;
        let creator = PoolParticipant::new(pool.pool_id, profile.profile_id, now);
        self.uow.pools.create_pool(&pool, &creator).await?;
        info!(pool_id = %pool.pool_id, %user_id, "pool created");
        Ok(PoolSummary::new(pool, 1, now))
    }

    /// Active pools `profile_id` has not joined yet.
    pub async fn available_pools(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<PoolSummary>> {
        owned_profile(&self.uow, user_id, profile_id).await?;
        let joined: Vec<Uuid> = self
            .uow
            .pools
            .list_memberships(profile_id)
            .await?
            .into_iter()
            .map(|m| m.pool_id)
            .collect();

        let mut available = Vec::new();
        for pool in self.uow.pools.list_active_pools().await? {
            if joined.contains(&pool.pool_id) {
                continue;
            }
            let count = self.uow.pools.count_participants(pool.pool_id).await?;
            available.push(PoolSummary::new(pool, count, now));
        }
        Ok(available)
    }

    pub async fn join_pool(
        &self,
        user_id: Uuid,
        pool_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PoolParticipant> {
        owned_profile(&self.uow, user_id, profile_id).await?;
        let pool = self.pool(pool_id).await?;
        if !pool.is_active {
            return Err(HuddleError::Closed("This pool is no longer active".to_string()));
        }
        if now > pool.registration_deadline {
            return Err(HuddleError::Closed(
                "Registration for this pool has closed".to_string(),
            ));
        }
        if self
            .uow
            .pools
            .get_participant(pool_id, profile_id)
            .await?
            .is_some()
        {
            return Err(HuddleError::Conflict(
                "You have already joined this pool".to_string(),
            ));
        }

        let participant = PoolParticipant::new(pool_id, profile_id, now);
        self.uow.pools.add_participant(&participant).await?;
        info!(%pool_id, %profile_id, "joined pool");
        Ok(participant)
    }

    /// Memberships of a profile with drafted teams and draft point totals.
    pub async fn my_pools(&self, user_id: Uuid, profile_id: Uuid) -> Result<Vec<Membership>> {
        owned_profile(&self.uow, user_id, profile_id).await?;
        let teams = team_index(&self.uow).await?;

        let mut memberships = Vec::new();
        for membership in self.uow.pools.list_memberships(profile_id).await? {
            let Some(pool) = self.uow.pools.get_pool(membership.pool_id).await? else {
                continue;
            };
            let selections = self
                .uow
                .selections
                .list_for_entry(pool.pool_id, profile_id)
                .await?;
            let selections = describe_selections(&selections, &teams);
            memberships.push(Membership {
                pool,
                selections_complete: membership.selections_complete,
                joined_at: membership.joined_at,
                draft_points: selections.iter().map(|s| s.points).sum(),
                selections,
            });
        }
        Ok(memberships)
    }

    pub async fn pool_detail(&self, pool_id: Uuid, now: DateTime<Utc>) -> Result<PoolDetail> {
        let pool = self.pool(pool_id).await?;
        let entries = self.uow.pools.list_entries(pool_id).await?;
        let participants: Vec<ParticipantView> = entries
            .into_iter()
            .map(|entry| ParticipantView {
                profile_id: entry.participant.profile_id,
                display_name: entry.display_name,
                selections_complete: entry.participant.selections_complete,
                joined_at: entry.participant.joined_at,
            })
            .collect();
        Ok(PoolDetail {
            summary: PoolSummary::new(pool, participants.len() as i64, now),
            participants,
        })
    }

    /// Only the creating account may delete a pool.
    pub async fn delete_pool(&self, user_id: Uuid, pool_id: Uuid) -> Result<()> {
        let pool = self.pool(pool_id).await?;
        if pool.created_by != Some(user_id) {
            return Err(HuddleError::Forbidden(
                "Only the pool creator can delete this pool".to_string(),
            ));
        }
        self.uow.pools.delete_pool(pool_id).await?;
        info!(%pool_id, %user_id, "pool deleted");
        Ok(())
    }

    async fn pool(&self, pool_id: Uuid) -> Result<Pool> {
        self.uow
            .pools
            .get_pool(pool_id)
            .await?
            .ok_or_else(|| HuddleError::NotFound("Pool not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn creator_is_enrolled_and_pool_is_listed_for_others() {
        let fx = Fixture::seeded().await;
        let (alice, alice_profile) = fx.account("Alice").await;
        let (bob, bob_profile) = fx.account("Bob").await;
        let pool_id = fx.pool(alice, &alice_profile, 20).await;

        let mine = fx.pools().my_pools(alice, alice_profile.profile_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(!mine[0].selections_complete);

        let open = fx
            .pools()
            .available_pools(bob, bob_profile.profile_id, fx.now)
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].pool.pool_id, pool_id);
        assert_eq!(open[0].participant_count, 1);
        assert!(open[0].registration_open);
        assert!(!open[0].is_full);

        assert!(
            fx.pools()
                .available_pools(alice, alice_profile.profile_id, fx.now)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn joining_respects_capacity_deadline_and_duplicates() {
        let fx = Fixture::seeded().await;
        let (alice, alice_profile) = fx.account("Alice").await;
        let (bob, bob_profile) = fx.account("Bob").await;
        let (carol, carol_profile) = fx.account("Carol").await;
        let pool_id = fx.pool(alice, &alice_profile, 2).await;

        let late = fx.now + Duration::days(8);
        assert!(matches!(
            fx.pools().join_pool(bob, pool_id, bob_profile.profile_id, late).await,
            Err(HuddleError::Closed(_))
        ));

        fx.pools()
            .join_pool(bob, pool_id, bob_profile.profile_id, fx.now)
            .await
            .unwrap();
        assert!(matches!(
            fx.pools().join_pool(bob, pool_id, bob_profile.profile_id, fx.now).await,
            Err(HuddleError::Conflict(_))
        ));
        let full = fx
            .pools()
            .join_pool(carol, pool_id, carol_profile.profile_id, fx.now)
            .await
            .unwrap_err();
        assert!(matches!(full, HuddleError::Conflict(msg) if msg == "Pool is full"));

        let detail = fx.pools().pool_detail(pool_id, fx.now).await.unwrap();
        assert_eq!(detail.summary.participant_count, 2);
        assert!(detail.summary.is_full);
        assert_eq!(detail.participants[0].profile_id, alice_profile.profile_id);
    }

    #[tokio::test]
    async fn cannot_join_with_someone_elses_profile() {
        let fx = Fixture::seeded().await;
        let (alice, alice_profile) = fx.account("Alice").await;
        let (bob, _) = fx.account("Bob").await;
        let pool_id = fx.pool(alice, &alice_profile, 20).await;
        let (_, carol_profile) = fx.account("Carol").await;

        assert!(matches!(
            fx.pools().join_pool(bob, pool_id, carol_profile.profile_id, fx.now).await,
            Err(HuddleError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn only_creator_deletes_and_delete_cascades() {
        let fx = Fixture::seeded().await;
        let (alice, alice_profile) = fx.account("Alice").await;
        let (bob, bob_profile) = fx.account("Bob").await;
        let pool_id = fx.pool(alice, &alice_profile, 20).await;
        fx.pools()
            .join_pool(bob, pool_id, bob_profile.profile_id, fx.now)
            .await
            .unwrap();

        assert!(matches!(
            fx.pools().delete_pool(bob, pool_id).await,
            Err(HuddleError::Forbidden(_))
        ));
        fx.pools().delete_pool(alice, pool_id).await.unwrap();
        assert!(fx.uow.pools.get_pool(pool_id).await.unwrap().is_none());
        assert!(
            fx.uow
                .pools
                .list_memberships(bob_profile.profile_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}

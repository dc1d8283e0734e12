use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::application::profiles::owned_profile;
use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::nfl::{Conference, Division, Team};
use crate::domain::pools::{DraftPicks, Pool, TeamSelection};
use crate::error::{HuddleError, Result};

/// A drafted team as shown on entry and pool pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedTeam {
    pub selection_order: i32,
    pub team_id: Uuid,
    pub team_code: String,
    pub display_name: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySelections {
    pub pool_id: Uuid,
    pub profile_id: Uuid,
    pub selections_complete: bool,
    pub selections: Vec<SelectedTeam>,
    pub total_points: i32,
    pub draft_locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DivisionBoard {
    pub division: Division,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConferenceBoard {
    pub conference: Conference,
    pub divisions: Vec<DivisionBoard>,
}

/// Join selections with team metadata in pick order.
pub(crate) fn describe_selections(
    selections: &[TeamSelection],
    teams: &HashMap<Uuid, Team>,
) -> Vec<SelectedTeam> {
    let mut described: Vec<SelectedTeam> = selections
        .iter()
        .filter_map(|selection| {
            let team = teams.get(&selection.team_id)?;
            Some(SelectedTeam {
                selection_order: selection.selection_order,
                team_id: team.team_id,
                team_code: team.team_code.clone(),
                display_name: team.display_name(),
                points: team.points,
            })
        })
        .collect();
    described.sort_by_key(|s| s.selection_order);
    described
}

pub(crate) async fn team_index(uow: &AppUnitOfWork) -> Result<HashMap<Uuid, Team>> {
    Ok(uow
        .nfl
        .list_teams()
        .await?
        .into_iter()
        .map(|team| (team.team_id, team))
        .collect())
}

/// Drafts close once the first game of the pool's season kicks off.
pub(crate) async fn draft_locked(
    uow: &AppUnitOfWork,
    season_year: i32,
    now: DateTime<Utc>,
) -> Result<bool> {
    let Some(season) = uow.nfl.get_season_by_year(season_year).await? else {
        return Ok(false);
    };
    let kickoff = uow
        .nfl
        .list_games(season.season_id)
        .await?
        .iter()
        .map(|game| game.game_date)
        .min();
    Ok(kickoff.is_some_and(|kickoff| now >= kickoff))
}

#[derive(Debug, Clone)]
pub struct DraftService {
    uow: Arc<AppUnitOfWork>,
}

impl DraftService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    /// Active teams grouped AFC/NFC, then East/North/South/West, by city.
    pub async fn team_board(&self) -> Result<Vec<ConferenceBoard>> {
        let mut teams: Vec<Team> = self
            .uow
            .nfl
            .list_teams()
            .await?
            .into_iter()
            .filter(|team| team.is_active)
            .collect();
        teams.sort_by(|a, b| {
            a.team_city
                .cmp(&b.team_city)
                .then_with(|| a.team_name.cmp(&b.team_name))
        });

        Ok(Conference::ALL
            .into_iter()
            .map(|conference| ConferenceBoard {
                conference,
                divisions: Division::ALL
                    .into_iter()
                    .map(|division| DivisionBoard {
                        division,
                        teams: teams
                            .iter()
                            .filter(|t| t.conference == conference && t.division == division)
                            .cloned()
                            .collect(),
                    })
                    .collect(),
            })
            .collect())
    }

    /// The caller's own entry in a pool, picks in draft order.
    pub async fn entry_selections(
        &self,
        user_id: Uuid,
        pool_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EntrySelections> {
        owned_profile(&self.uow, user_id, profile_id).await?;
        let pool = self.pool(pool_id).await?;
        let participant = self
            .uow
            .pools
            .get_participant(pool_id, profile_id)
            .await?
            .ok_or_else(|| {
                HuddleError::NotFound("Profile has not joined this pool".to_string())
            })?;
        let selections = self.uow.selections.list_for_entry(pool_id, profile_id).await?;
        let teams = team_index(&self.uow).await?;
        let described = describe_selections(&selections, &teams);

        Ok(EntrySelections {
            pool_id,
            profile_id,
            selections_complete: participant.selections_complete,
            total_points: described.iter().map(|s| s.points).sum(),
            selections: described,
            draft_locked: draft_locked(&self.uow, pool.season_year, now).await?,
        })
    }

    /// Replace an entry's picks with exactly four distinct active teams.
    pub async fn save_selections(
        &self,
        user_id: Uuid,
        pool_id: Uuid,
        profile_id: Uuid,
        team_ids: Vec<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<EntrySelections> {
        let pool = self.editable_entry(user_id, pool_id, profile_id, now).await?;
        let picks = DraftPicks::new(team_ids)?;

        let teams = team_index(&self.uow).await?;
        for team_id in picks.team_ids() {
            match teams.get(team_id) {
                Some(team) if team.is_active => {}
                _ => {
                    return Err(HuddleError::Validation(format!(
                        "Unknown or inactive team {team_id}"
                    )));
                }
            }
        }

        let rows = picks.to_selections(pool.pool_id, profile_id, now);
        self.uow
            .selections
            .replace_selections(pool.pool_id, profile_id, &rows)
            .await?;
        info!(%pool_id, %profile_id, "saved draft selections");
        self.entry_selections(user_id, pool_id, profile_id, now).await
    }

    pub async fn clear_selections(
        &self,
        user_id: Uuid,
        pool_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.editable_entry(user_id, pool_id, profile_id, now).await?;
        self.uow
            .selections
            .clear_selections(pool_id, profile_id)
            .await?;
        info!(%pool_id, %profile_id, "cleared draft selections");
        Ok(())
    }

    async fn pool(&self, pool_id: Uuid) -> Result<Pool> {
        self.uow
            .pools
            .get_pool(pool_id)
            .await?
            .ok_or_else(|| HuddleError::NotFound("Pool not found".to_string()))
    }

    async fn editable_entry(
        &self,
        user_id: Uuid,
        pool_id: Uuid,
        profile_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Pool> {
        owned_profile(&self.uow, user_id, profile_id).await?;
        let pool = self.pool(pool_id).await?;
        if self
            .uow
            .pools
            .get_participant(pool_id, profile_id)
            .await?
            .is_none()
        {
            return Err(HuddleError::Forbidden(
                "Join the pool before drafting teams".to_string(),
            ));
        }
        if draft_locked(&self.uow, pool.season_year, now).await? {
            return Err(HuddleError::Closed(
                "The draft is locked because the season has started".to_string(),
            ));
        }
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::application::test_support::{Fixture, SEASON};
    use crate::domain::pools::DRAFT_SIZE;

    async fn team_ids(fx: &Fixture, count: usize) -> Vec<Uuid> {
        fx.uow
            .nfl
            .list_teams()
            .await
            .unwrap()
            .into_iter()
            .take(count)
            .map(|t| t.team_id)
            .collect()
    }

    #[tokio::test]
    async fn board_groups_all_teams_by_conference_and_division() {
        let fx = Fixture::seeded().await;
        let board = fx.draft().team_board().await.unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].conference, Conference::Afc);
        for conference in &board {
            assert_eq!(conference.divisions.len(), 4);
            for division in &conference.divisions {
                assert_eq!(division.teams.len(), 4);
                let cities: Vec<&str> =
                    division.teams.iter().map(|t| t.team_city.as_str()).collect();
                let mut sorted = cities.clone();
                sorted.sort();
                assert_eq!(cities, sorted);
            }
        }
    }

    #[tokio::test]
    async fn saving_a_draft_stores_four_ordered_picks() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let pool_id = fx.pool(alice, &profile, 20).await;
        let picks = team_ids(&fx, DRAFT_SIZE).await;

        let entry = fx
            .draft()
            .save_selections(alice, pool_id, profile.profile_id, picks.clone(), fx.now)
            .await
            .unwrap();
        assert!(entry.selections_complete);
        assert!(!entry.draft_locked);
        let orders: Vec<i32> = entry.selections.iter().map(|s| s.selection_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        let saved: Vec<Uuid> = entry.selections.iter().map(|s| s.team_id).collect();
        assert_eq!(saved, picks);
        assert_eq!(
            entry.total_points,
            entry.selections.iter().map(|s| s.points).sum::<i32>()
        );

        // Saving again replaces rather than appends.
        let mut reordered = picks.clone();
        reordered.reverse();
        let entry = fx
            .draft()
            .save_selections(alice, pool_id, profile.profile_id, reordered.clone(), fx.now)
            .await
            .unwrap();
        assert_eq!(entry.selections.len(), DRAFT_SIZE);
        assert_eq!(entry.selections[0].team_id, reordered[0]);
    }

    #[tokio::test]
    async fn draft_size_and_duplicates_are_validated() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let pool_id = fx.pool(alice, &profile, 20).await;
        let picks = team_ids(&fx, 3).await;

        let err = fx
            .draft()
            .save_selections(alice, pool_id, profile.profile_id, picks.clone(), fx.now)
            .await
            .unwrap_err();
        assert!(
            matches!(err, HuddleError::Validation(msg) if msg == "Please select exactly 4 teams. You've selected 3.")
        );

        let mut dup = picks.clone();
        dup.push(picks[0]);
        assert!(matches!(
            fx.draft()
                .save_selections(alice, pool_id, profile.profile_id, dup, fx.now)
                .await,
            Err(HuddleError::Validation(_))
        ));

        let mut unknown = picks;
        unknown.push(Uuid::now_v7());
        assert!(matches!(
            fx.draft()
                .save_selections(alice, pool_id, profile.profile_id, unknown, fx.now)
                .await,
            Err(HuddleError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn clearing_marks_entry_incomplete() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let pool_id = fx.pool(alice, &profile, 20).await;
        let picks = team_ids(&fx, DRAFT_SIZE).await;
        fx.draft()
            .save_selections(alice, pool_id, profile.profile_id, picks, fx.now)
            .await
            .unwrap();

        fx.draft()
            .clear_selections(alice, pool_id, profile.profile_id, fx.now)
            .await
            .unwrap();
        let entry = fx
            .draft()
            .entry_selections(alice, pool_id, profile.profile_id, fx.now)
            .await
            .unwrap();
        assert!(!entry.selections_complete);
        assert!(entry.selections.is_empty());
        assert_eq!(entry.total_points, 0);
    }

    #[tokio::test]
    async fn draft_locks_at_first_kickoff() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let pool_id = fx.pool(alice, &profile, 20).await;
        let picks = team_ids(&fx, DRAFT_SIZE).await;

        let kickoff = Utc.with_ymd_and_hms(SEASON, 9, 7, 17, 0, 0).unwrap();
        let err = fx
            .draft()
            .save_selections(alice, pool_id, profile.profile_id, picks, kickoff)
            .await
            .unwrap_err();
        assert!(matches!(err, HuddleError::Closed(_)));
        assert!(matches!(
            fx.draft()
                .clear_selections(alice, pool_id, profile.profile_id, kickoff)
                .await,
            Err(HuddleError::Closed(_))
        ));
    }

    #[tokio::test]
    async fn entries_are_private_to_their_owner() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let (mallory, _) = fx.account("Mallory").await;
        let pool_id = fx.pool(alice, &profile, 20).await;

        assert!(matches!(
            fx.draft()
                .entry_selections(mallory, pool_id, profile.profile_id, fx.now)
                .await,
            Err(HuddleError::Forbidden(_))
        ));
        let entry = fx
            .draft()
            .entry_selections(alice, pool_id, profile.profile_id, fx.now)
            .await
            .unwrap();
        assert!(!entry.selections_complete);
    }

    #[tokio::test]
    async fn non_participants_cannot_draft() {
        let fx = Fixture::seeded().await;
        let (alice, alice_profile) = fx.account("Alice").await;
        let (bob, bob_profile) = fx.account("Bob").await;
        let pool_id = fx.pool(alice, &alice_profile, 20).await;
        let picks = team_ids(&fx, DRAFT_SIZE).await;

        assert!(matches!(
            fx.draft()
                .save_selections(bob, pool_id, bob_profile.profile_id, picks, fx.now)
                .await,
            Err(HuddleError::Forbidden(_))
        ));
    }
}

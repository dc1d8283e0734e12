use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::application::profiles::owned_profile;
use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::nfl::{Season, Week};
use crate::domain::users::Profile;
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct SeasonOverview {
    #[serde(flatten)]
    pub season: Season,
    pub current_week: u32,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPool {
    pub pool_id: Uuid,
    pub pool_name: String,
    pub season_year: i32,
    pub selections_complete: bool,
    pub total_points: i32,
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: Profile,
    pub active_pools: usize,
    pub teams_selected: i64,
    pub current_week: u32,
    pub pools: Vec<DashboardPool>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    uow: Arc<AppUnitOfWork>,
}

impl DashboardService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn current_season(&self, today: NaiveDate) -> Result<Option<SeasonOverview>> {
        let Some(season) = self.uow.nfl.get_current_season().await? else {
            return Ok(None);
        };
        let weeks = self.uow.nfl.list_weeks(season.season_id).await?;
        Ok(Some(SeasonOverview {
            current_week: season.calendar().current_week(today),
            season,
            weeks,
        }))
    }

    pub async fn dashboard(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
        today: NaiveDate,
    ) -> Result<Dashboard> {
        let profile = owned_profile(&self.uow, user_id, profile_id).await?;
        let current_week = self
            .uow
            .nfl
            .get_current_season()
            .await?
            .map_or(0, |season| season.calendar().current_week(today));

        let mut pools = Vec::new();
        for membership in self.uow.pools.list_memberships(profile_id).await? {
            let Some(pool) = self.uow.pools.get_pool(membership.pool_id).await? else {
                continue;
            };
            if !pool.is_active {
                continue;
            }
            let latest = self
                .uow
                .scores
                .list_for_entry(pool.pool_id, profile_id)
                .await?
                .pop();
            pools.push(DashboardPool {
                pool_id: pool.pool_id,
                pool_name: pool.pool_name,
                season_year: pool.season_year,
                selections_complete: membership.selections_complete,
                total_points: latest.as_ref().map_or(0, |s| s.total_points),
                rank: latest.and_then(|s| s.rank_position),
            });
        }

        Ok(Dashboard {
            active_pools: pools.len(),
            teams_selected: self.uow.selections.count_for_profile(profile_id).await?,
            current_week,
            profile,
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{Fixture, SEASON};
    use crate::error::HuddleError;

    #[tokio::test]
    async fn current_season_reports_week_zero_before_kickoff() {
        let fx = Fixture::seeded().await;
        let dashboard = fx.dashboard();

        let overview = dashboard
            .current_season(fx.now.date_naive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(overview.season.season_year, SEASON);
        assert_eq!(overview.current_week, 0);
        assert_eq!(overview.weeks.len(), 18);

        let week_three = NaiveDate::from_ymd_opt(SEASON, 9, 22).unwrap();
        let overview = dashboard.current_season(week_three).await.unwrap().unwrap();
        assert_eq!(overview.current_week, 3);
    }

    #[tokio::test]
    async fn dashboard_summarizes_memberships() {
        let fx = Fixture::seeded().await;
        let (alice, profile) = fx.account("Alice").await;
        let pool_id = fx.pool(alice, &profile, 20).await;
        let games = fx.games_in_week(1).await;
        let picks: Vec<Uuid> = games.iter().take(4).map(|g| g.home_team_id).collect();
        fx.draft()
            .save_selections(alice, pool_id, profile.profile_id, picks, fx.now)
            .await
            .unwrap();
        fx.scoring()
            .record_game_result(games[0].game_id, 24, 17, fx.now)
            .await
            .unwrap();

        let today = fx.now.date_naive();
        let summary = fx
            .dashboard()
            .dashboard(alice, profile.profile_id, today)
            .await
            .unwrap();
        assert_eq!(summary.active_pools, 1);
        assert_eq!(summary.teams_selected, 4);
        assert_eq!(summary.current_week, 0);
        assert!(summary.pools[0].selections_complete);
        assert_eq!(summary.pools[0].total_points, 10);
        assert_eq!(summary.pools[0].rank, Some(1));

        let (bob, _) = fx.account("Bob").await;
        assert!(matches!(
            fx.dashboard().dashboard(bob, profile.profile_id, today).await,
            Err(HuddleError::Forbidden(_))
        ));
    }
}

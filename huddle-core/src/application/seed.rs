use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::scoring::ScoringService;
use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::nfl::schedule::generate_schedule;
use crate::domain::nfl::season::REGULAR_SEASON_WEEKS;
use crate::domain::nfl::{GameStatus, NFL_TEAMS, Season, SeasonCalendar, Team, TeamPerformance};
use crate::domain::pools::{Pool, PoolParticipant};
use crate::domain::users::auth::AuthCrypto;
use crate::domain::users::{Profile, User};
use crate::error::{HuddleError, Result};

pub const SAMPLE_PASSWORD: &str = "password";
const SAMPLE_USERS: [(&str, &str, &str); 2] = [
    ("test@example.com", "Test", "User"),
    ("john@example.com", "John", "Doe"),
];
const SAMPLE_ENTRY_FEE_CENTS: i64 = 2000;
const SAMPLE_MAX_PARTICIPANTS: i32 = 20;
const SAMPLE_DEADLINE_DAYS: i64 = 7;
const MAX_SIMULATED_SCORE: i32 = 45;

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub season_year: i32,
    pub with_samples: bool,
    /// Seed even when teams already exist.
    pub force: bool,
    pub rng_seed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub skipped: bool,
    pub teams: usize,
    pub weeks: usize,
    pub games: usize,
    pub sample_users: usize,
    pub sample_pool: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    pub games_recorded: usize,
    pub pools_recomputed: usize,
}

/// Loads reference data and demo content.
#[derive(Clone)]
pub struct Seeder {
    uow: Arc<AppUnitOfWork>,
    crypto: Arc<AuthCrypto>,
}

impl std::fmt::Debug for Seeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seeder").finish_non_exhaustive()
    }
}

impl Seeder {
    pub fn new(uow: Arc<AppUnitOfWork>, crypto: Arc<AuthCrypto>) -> Self {
        Self { uow, crypto }
    }

    pub async fn seed(&self, options: SeedOptions, now: DateTime<Utc>) -> Result<SeedReport> {
        if self.uow.nfl.count_teams().await? > 0 && !options.force {
            info!("reference data already present; skipping seed");
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }

        let catalog: Vec<Team> = NFL_TEAMS.iter().map(|seed| seed.to_team()).collect();
        self.uow.nfl.upsert_teams(&catalog).await?;
        let teams = self.uow.nfl.list_teams().await?;
        let mut report = SeedReport {
            teams: teams.len(),
            ..SeedReport::default()
        };

        match self.uow.nfl.get_season_by_year(options.season_year).await? {
            Some(season) => {
                warn!(year = season.season_year, "season already exists; keeping its schedule");
            }
            None => {
                let season = Season {
                    season_id: Uuid::now_v7(),
                    season_year: options.season_year,
                    regular_season_weeks: REGULAR_SEASON_WEEKS as i32,
                    is_current: true,
                };
                let weeks = SeasonCalendar::regular(options.season_year)
                    .build_weeks(season.season_id);
                self.uow.nfl.create_season(&season, &weeks).await?;

                let team_ids: Vec<Uuid> = teams.iter().map(|t| t.team_id).collect();
                let mut rng = StdRng::seed_from_u64(options.rng_seed);
                let games = generate_schedule(season.season_id, &team_ids, &weeks, &mut rng);
                self.uow.nfl.insert_games(&games).await?;

                let records: Vec<TeamPerformance> = team_ids
                    .iter()
                    .map(|team_id| TeamPerformance::empty(*team_id, season.season_id, now))
                    .collect();
                self.uow.nfl.save_team_performance(&records).await?;

                report.weeks = weeks.len();
                report.games = games.len();
            }
        }

        if options.with_samples {
            let profiles = self.seed_sample_users(now).await?;
            report.sample_users = profiles.len();
            report.sample_pool = self
                .seed_sample_pool(options.season_year, &profiles, now)
                .await?;
        }

        info!(
            teams = report.teams,
            weeks = report.weeks,
            games = report.games,
            "seed complete"
        );
        Ok(report)
    }

    pub async fn reset(&self) -> Result<()> {
        self.uow.maintenance.reset_all().await
    }

    /// Record random scores for unplayed games through `through_week` of the
    /// current season, then rescore its pools.
    pub async fn simulate(
        &self,
        scoring: &ScoringService,
        through_week: i32,
        rng_seed: u64,
        now: DateTime<Utc>,
    ) -> Result<SimulationReport> {
        let season = self
            .uow
            .nfl
            .get_current_season()
            .await?
            .ok_or_else(|| HuddleError::NotFound("No current season; run the seed first".to_string()))?;
        let weeks: Vec<Uuid> = self
            .uow
            .nfl
            .list_weeks(season.season_id)
            .await?
            .into_iter()
            .filter(|w| w.week_number <= through_week)
            .map(|w| w.week_id)
            .collect();

        let mut rng = StdRng::seed_from_u64(rng_seed);
        let mut games_recorded = 0;
        for game in self.uow.nfl.list_games(season.season_id).await? {
            if game.game_status == GameStatus::Completed || !weeks.contains(&game.week_id) {
                continue;
            }
            let home = rng.random_range(0..=MAX_SIMULATED_SCORE);
            let away = rng.random_range(0..=MAX_SIMULATED_SCORE);
            self.uow.nfl.record_result(game.game_id, home, away).await?;
            games_recorded += 1;
        }

        scoring.refresh_team_performance(season.season_id, now).await?;
        let pools_recomputed = scoring.recompute_season_pools(season.season_year, now).await?;
        info!(games_recorded, pools_recomputed, "simulation complete");
        Ok(SimulationReport {
            games_recorded,
            pools_recomputed,
        })
    }

    async fn seed_sample_users(&self, now: DateTime<Utc>) -> Result<Vec<Profile>> {
        let password_hash = self.crypto.hash_password(SAMPLE_PASSWORD)?;
        let mut profiles = Vec::with_capacity(SAMPLE_USERS.len());
        for (email, first_name, last_name) in SAMPLE_USERS {
            if let Some(existing) = self.uow.users.get_user_by_email(email).await? {
                let mut owned = self
                    .uow
                    .profiles
                    .list_profiles_for_user(existing.user_id)
                    .await?;
                if !owned.is_empty() {
                    profiles.push(owned.remove(0));
                }
                continue;
            }
            let user = User {
                user_id: Uuid::now_v7(),
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                is_active: true,
                email_verified: true,
                created_at: now,
                updated_at: now,
                last_login_at: None,
            };
            let name = user.full_name();
            let profile = Profile {
                profile_id: Uuid::now_v7(),
                user_id: user.user_id,
                profile_name: name.clone(),
                display_name: name,
                created_at: now,
            };
            self.uow
                .users
                .create_user_with_profile(&user, &password_hash, &profile)
                .await?;
            profiles.push(profile);
        }
        Ok(profiles)
    }

    async fn seed_sample_pool(
        &self,
        season_year: i32,
        profiles: &[Profile],
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>> {
        let Some((creator, others)) = profiles.split_first() else {
            return Ok(None);
        };
        let pool_name = format!("Family Pool {season_year}");
        if let Some(existing) = self
            .uow
            .pools
            .list_pools_for_season(season_year)
            .await?
            .into_iter()
            .find(|pool| pool.pool_name == pool_name)
        {
            return Ok(Some(existing.pool_id));
        }

        let pool = Pool {
            pool_id: Uuid::now_v7(),
            pool_name,
            pool_description: Some(
                "Annual family football pool - may the best teams win!".to_string(),
            ),
            created_by: Some(creator.user_id),
            season_year,
            entry_fee: Decimal::new(SAMPLE_ENTRY_FEE_CENTS, 2),
            max_participants: SAMPLE_MAX_PARTICIPANTS,
            registration_deadline: now + Duration::days(SAMPLE_DEADLINE_DAYS),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let owner = PoolParticipant::new(pool.pool_id, creator.profile_id, now);
        self.uow.pools.create_pool(&pool, &owner).await?;
        for profile in others {
            self.uow
                .pools
                .add_participant(&PoolParticipant::new(pool.pool_id, profile.profile_id, now))
                .await?;
        }
        Ok(Some(pool.pool_id))
    }
}

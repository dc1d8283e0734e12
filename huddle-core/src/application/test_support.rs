use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::application::{
    AccountService, DashboardService, DraftService, PoolService, ScoringService, SeedOptions,
    Seeder, unit_of_work::AppUnitOfWork,
};
use crate::domain::nfl::{Game, Week};
use crate::domain::pools::CreatePoolRequest;
use crate::domain::scoring::ScoringRules;
use crate::domain::users::auth::{AuthCrypto, SessionPolicy};
use crate::domain::users::{Profile, RegisterRequest};

pub(crate) const SEASON: i32 = 2030;

/// June 1st of the seeded season: registration open, draft not yet locked.
pub(crate) fn preseason() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(SEASON, 6, 1, 12, 0, 0).unwrap()
}

pub(crate) struct Fixture {
    pub uow: Arc<AppUnitOfWork>,
    pub crypto: Arc<AuthCrypto>,
    pub now: DateTime<Utc>,
}

impl Fixture {
    pub async fn seeded() -> Self {
        let fixture = Self {
            uow: Arc::new(AppUnitOfWork::in_memory()),
            crypto: Arc::new(AuthCrypto::for_tests("pepper", "token-key").unwrap()),
            now: preseason(),
        };
        fixture
            .seeder()
            .seed(
                SeedOptions {
                    season_year: SEASON,
                    with_samples: false,
                    force: false,
                    rng_seed: 7,
                },
                fixture.now,
            )
            .await
            .unwrap();
        fixture
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.uow.clone(), self.crypto.clone(), SessionPolicy::default())
    }
    pub fn pools(&self) -> PoolService {
        PoolService::new(self.uow.clone())
    }
    pub fn draft(&self) -> DraftService {
        DraftService::new(self.uow.clone())
    }
    pub fn scoring(&self) -> ScoringService {
        ScoringService::new(self.uow.clone(), ScoringRules::default())
    }
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.uow.clone())
    }
    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.uow.clone(), self.crypto.clone())
    }

    /// Register an account and return its id and default profile.
    pub async fn account(&self, first_name: &str) -> (Uuid, Profile) {
        let outcome = self
            .accounts()
            .register(
                RegisterRequest {
                    email: format!("{}@example.com", first_name.to_lowercase()),
                    password: "secret1".into(),
                    confirm_password: "secret1".into(),
                    first_name: first_name.into(),
                    last_name: "Tester".into(),
                },
                self.now,
            )
            .await
            .unwrap();
        (outcome.user.user_id, outcome.profiles[0].clone())
    }

    pub async fn pool(&self, user_id: Uuid, profile: &Profile, max: i32) -> Uuid {
        self.pools()
            .create_pool(
                user_id,
                CreatePoolRequest {
                    profile_id: profile.profile_id,
                    pool_name: "Test Pool".into(),
                    pool_description: None,
                    season_year: Some(SEASON),
                    entry_fee: None,
                    max_participants: Some(max),
                    registration_deadline_days: None,
                },
                self.now,
            )
            .await
            .unwrap()
            .pool
            .pool_id
    }

    pub async fn week(&self, number: i32) -> Week {
        let season = self.uow.nfl.get_season_by_year(SEASON).await.unwrap().unwrap();
        self.uow
            .nfl
            .list_weeks(season.season_id)
            .await
            .unwrap()
            .into_iter()
            .find(|w| w.week_number == number)
            .unwrap()
    }

    pub async fn games_in_week(&self, number: i32) -> Vec<Game> {
        let week = self.week(number).await;
        self.uow
            .nfl
            .list_games(week.season_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|g| g.week_id == week.week_id)
            .collect()
    }
}

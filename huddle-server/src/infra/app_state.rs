use std::{fmt, sync::Arc};

use huddle_core::application::{
    AccountService, DashboardService, DraftService, PoolService, ProfileService,
    ScoringService, Seeder,
};
use huddle_core::database::PostgresDatabase;
use huddle_core::domain::scoring::ScoringRules;
use huddle_core::domain::users::auth::SessionPolicy;
use huddle_core::{AppUnitOfWork, AuthCrypto};

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    /// Present when running against PostgreSQL; the in-memory adapter
    /// used by tests leaves it empty.
    pub postgres: Option<Arc<PostgresDatabase>>,
    pub auth_crypto: Arc<AuthCrypto>,
    pub accounts: Arc<AccountService>,
    pub profiles: Arc<ProfileService>,
    pub pools: Arc<PoolService>,
    pub draft: Arc<DraftService>,
    pub scoring: Arc<ScoringService>,
    pub dashboard: Arc<DashboardService>,
    /// Shared secret for the results/admin endpoints. `None` disables them.
    pub service_key: Option<Arc<str>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("postgres", &self.postgres.is_some())
            .field("service_key_configured", &self.service_key.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        unit_of_work: Arc<AppUnitOfWork>,
        auth_crypto: Arc<AuthCrypto>,
        policy: SessionPolicy,
        rules: ScoringRules,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                unit_of_work.clone(),
                auth_crypto.clone(),
                policy,
            )),
            profiles: Arc::new(ProfileService::new(unit_of_work.clone())),
            pools: Arc::new(PoolService::new(unit_of_work.clone())),
            draft: Arc::new(DraftService::new(unit_of_work.clone())),
            scoring: Arc::new(ScoringService::new(unit_of_work.clone(), rules)),
            dashboard: Arc::new(DashboardService::new(unit_of_work.clone())),
            unit_of_work,
            auth_crypto,
            postgres: None,
            service_key: None,
        }
    }

    pub fn with_postgres(mut self, postgres: Arc<PostgresDatabase>) -> Self {
        self.postgres = Some(postgres);
        self
    }

    pub fn with_service_key(mut self, key: Option<String>) -> Self {
        self.service_key = key.filter(|k| !k.is_empty()).map(Arc::from);
        self
    }

    pub fn unit_of_work(&self) -> Arc<AppUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.unit_of_work(), self.auth_crypto.clone())
    }
}

use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::postgres::repositories::{
    maintenance::PostgresMaintenanceRepository, nfl::PostgresNflRepository,
    pools::PostgresPoolsRepository, profiles::PostgresProfilesRepository,
    scores::PostgresScoresRepository, selections::PostgresSelectionsRepository,
    sessions::PostgresSessionsRepository, users::PostgresUsersRepository,
};
use crate::database::ports::{
    maintenance::MaintenanceRepository, nfl::NflRepository, pools::PoolsRepository,
    profiles::ProfilesRepository, scores::ScoresRepository,
    selections::SelectionsRepository, sessions::SessionsRepository,
    users::UsersRepository,
};
use crate::database::{InMemoryDatabase, PostgresDatabase};

/// Aggregates all repository ports used by application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub users: Arc<dyn UsersRepository>,
    pub sessions: Arc<dyn SessionsRepository>,
    pub profiles: Arc<dyn ProfilesRepository>,
    pub pools: Arc<dyn PoolsRepository>,
    pub selections: Arc<dyn SelectionsRepository>,
    pub nfl: Arc<dyn NflRepository>,
    pub scores: Arc<dyn ScoresRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("sessions", &type_name_of_val(self.sessions.as_ref()))
            .field("profiles", &type_name_of_val(self.profiles.as_ref()))
            .field("pools", &type_name_of_val(self.pools.as_ref()))
            .field("selections", &type_name_of_val(self.selections.as_ref()))
            .field("nfl", &type_name_of_val(self.nfl.as_ref()))
            .field("scores", &type_name_of_val(self.scores.as_ref()))
            .field("maintenance", &type_name_of_val(self.maintenance.as_ref()))
            .finish()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    users: Option<Arc<dyn UsersRepository>>,
    sessions: Option<Arc<dyn SessionsRepository>>,
    profiles: Option<Arc<dyn ProfilesRepository>>,
    pools: Option<Arc<dyn PoolsRepository>>,
    selections: Option<Arc<dyn SelectionsRepository>>,
    nfl: Option<Arc<dyn NflRepository>>,
    scores: Option<Arc<dyn ScoresRepository>>,
    maintenance: Option<Arc<dyn MaintenanceRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("users", &self.users.is_some())
            .field("sessions", &self.sessions.is_some())
            .field("profiles", &self.profiles.is_some())
            .field("pools", &self.pools.is_some())
            .field("selections", &self.selections.is_some())
            .field("nfl", &self.nfl.is_some())
            .field("scores", &self.scores.is_some())
            .field("maintenance", &self.maintenance.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, repo: Arc<dyn UsersRepository>) -> Self {
        self.users = Some(repo);
        self
    }
    pub fn with_sessions(mut self, repo: Arc<dyn SessionsRepository>) -> Self {
        self.sessions = Some(repo);
        self
    }
    pub fn with_profiles(mut self, repo: Arc<dyn ProfilesRepository>) -> Self {
        self.profiles = Some(repo);
        self
    }
    pub fn with_pools(mut self, repo: Arc<dyn PoolsRepository>) -> Self {
        self.pools = Some(repo);
        self
    }
    pub fn with_selections(
        mut self,
        repo: Arc<dyn SelectionsRepository>,
    ) -> Self {
        self.selections = Some(repo);
        self
    }
    pub fn with_nfl(mut self, repo: Arc<dyn NflRepository>) -> Self {
        self.nfl = Some(repo);
        self
    }
    pub fn with_scores(mut self, repo: Arc<dyn ScoresRepository>) -> Self {
        self.scores = Some(repo);
        self
    }
    pub fn with_maintenance(
        mut self,
        repo: Arc<dyn MaintenanceRepository>,
    ) -> Self {
        self.maintenance = Some(repo);
        self
    }

    /// Populate the builder with Postgres-backed repository adapters.
    pub fn with_postgres(self, db: Arc<PostgresDatabase>) -> Self {
        let pool = db.pool().clone();
        self.with_users(Arc::new(PostgresUsersRepository::new(pool.clone())))
            .with_sessions(Arc::new(PostgresSessionsRepository::new(pool.clone())))
            .with_profiles(Arc::new(PostgresProfilesRepository::new(pool.clone())))
            .with_pools(Arc::new(PostgresPoolsRepository::new(pool.clone())))
            .with_selections(Arc::new(PostgresSelectionsRepository::new(pool.clone())))
            .with_nfl(Arc::new(PostgresNflRepository::new(pool.clone())))
            .with_scores(Arc::new(PostgresScoresRepository::new(pool.clone())))
            .with_maintenance(Arc::new(PostgresMaintenanceRepository::new(pool)))
    }

    /// Point every port at one shared in-memory store.
    pub fn with_memory(self, db: Arc<InMemoryDatabase>) -> Self {
        self.with_users(db.clone())
            .with_sessions(db.clone())
            .with_profiles(db.clone())
            .with_pools(db.clone())
            .with_selections(db.clone())
            .with_nfl(db.clone())
            .with_scores(db.clone())
            .with_maintenance(db)
    }

    /// Build a validated AppUnitOfWork. Returns a string error if any required
    /// repository is missing.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            users: self
                .users
                .ok_or_else(|| "missing UsersRepository".to_string())?,
            sessions: self
                .sessions
                .ok_or_else(|| "missing SessionsRepository".to_string())?,
            profiles: self
                .profiles
                .ok_or_else(|| "missing ProfilesRepository".to_string())?,
            pools: self
                .pools
                .ok_or_else(|| "missing PoolsRepository".to_string())?,
            selections: self
                .selections
                .ok_or_else(|| "missing SelectionsRepository".to_string())?,
            nfl: self
                .nfl
                .ok_or_else(|| "missing NflRepository".to_string())?,
            scores: self
                .scores
                .ok_or_else(|| "missing ScoresRepository".to_string())?,
            maintenance: self
                .maintenance
                .ok_or_else(|| "missing MaintenanceRepository".to_string())?,
        })
    }
}

impl AppUnitOfWork {
    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }

    /// Compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: Arc<PostgresDatabase>) -> Result<Self, String> {
        AppUnitOfWorkBuilder::new().with_postgres(db).build()
    }

    /// A unit of work over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::over_memory(Arc::new(InMemoryDatabase::new()))
    }

    pub fn over_memory(db: Arc<InMemoryDatabase>) -> Self {
        AppUnitOfWork {
            users: db.clone(),
            sessions: db.clone(),
            profiles: db.clone(),
            pools: db.clone(),
            selections: db.clone(),
            nfl: db.clone(),
            scores: db.clone(),
            maintenance: db,
        }
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::maintenance::MaintenanceRepository;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct PostgresMaintenanceRepository {
    pool: PgPool,
}

impl PostgresMaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Children first so each delete satisfies the remaining foreign keys.
const RESET_ORDER: [&str; 12] = [
    "pool_scores",
    "team_selections",
    "pool_participants",
    "pools",
    "team_performance",
    "nfl_games",
    "nfl_weeks",
    "nfl_seasons",
    "nfl_teams",
    "auth_sessions",
    "profiles",
    "users",
];

#[async_trait]
impl MaintenanceRepository for PostgresMaintenanceRepository {
    async fn reset_all(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin reset"))?;

        for table in RESET_ORDER {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(map_db_error("reset table"))?;
        }

        tx.commit().await.map_err(map_db_error("commit reset"))?;
        warn!("all application tables emptied");
        Ok(())
    }
}

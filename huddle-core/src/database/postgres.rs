use std::{fmt, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::{info, warn};

use crate::error::{HuddleError, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    min_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|s| s.parse::<u32>().ok())
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections =
            env_u32("DB_MAX_CONNECTIONS").unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let min_connections = env_u32("DB_MIN_CONNECTIONS")
            .unwrap_or(DEFAULT_MIN_CONNECTIONS)
            .min(max_connections);

        let connect_options: PgConnectOptions =
            connection_string.parse().map_err(|e| {
                HuddleError::Internal(format!("Invalid database URL: {e}"))
            })?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .max_lifetime(Duration::from_secs(1800))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                HuddleError::Internal(format!("Database connection failed: {e}"))
            })?;

        info!(
            max_connections,
            min_connections, "database pool initialized"
        );

        Ok(Self {
            pool,
            max_connections,
            min_connections,
        })
    }

    /// Wrap an existing pool, e.g. one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            max_size: self.max_connections,
            min_idle: self.min_connections,
        }
    }

    /// Run only the preflight checks without applying migrations.
    pub async fn preflight_only(&self) -> Result<()> {
        self.preflight_check().await
    }

    /// Verify connectivity and that the role may create objects in `public`.
    async fn preflight_check(&self) -> Result<()> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                HuddleError::Internal(format!("Connectivity check failed: {e}"))
            })?;
        info!(%version, "connected to PostgreSQL");

        let (current_user, can_create): (String, bool) = sqlx::query_as(
            "SELECT current_user::text, has_schema_privilege(current_user, 'public', 'CREATE')",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            HuddleError::Internal(format!("Privilege preflight failed: {e}"))
        })?;

        if !can_create {
            return Err(HuddleError::Internal(format!(
                "Role '{current_user}' lacks CREATE on schema public.\n\
                 Recommended fix (run as the database owner):\n  \
                 GRANT USAGE, CREATE ON SCHEMA public TO {current_user};"
            )));
        }
        Ok(())
    }

    /// Run preflight checks, then apply pending migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        self.preflight_check().await?;
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            warn!(error = %e, "migration failed");
            HuddleError::Internal(format!("Migration failed: {e}"))
        })?;
        info!("database schema is up to date");
        Ok(())
    }
}

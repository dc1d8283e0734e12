use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::pools::{PoolEntry, PoolsRepository};
use crate::domain::pools::{Pool, PoolParticipant};
use crate::error::{HuddleError, Result};

#[derive(Clone, Debug)]
pub struct PostgresPoolsRepository {
    pool: PgPool,
}

impl PostgresPoolsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PoolRow {
    pool_id: Uuid,
    pool_name: String,
    pool_description: Option<String>,
    created_by: Option<Uuid>,
    season_year: i32,
    entry_fee: Decimal,
    max_participants: i32,
    registration_deadline: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PoolRow> for Pool {
    fn from(r: PoolRow) -> Self {
        Pool {
            pool_id: r.pool_id,
            pool_name: r.pool_name,
            pool_description: r.pool_description,
            created_by: r.created_by,
            season_year: r.season_year,
            entry_fee: r.entry_fee,
            max_participants: r.max_participants,
            registration_deadline: r.registration_deadline,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ParticipantRow {
    participant_id: Uuid,
    pool_id: Uuid,
    profile_id: Uuid,
    selections_complete: bool,
    joined_at: DateTime<Utc>,
}

impl From<ParticipantRow> for PoolParticipant {
    fn from(r: ParticipantRow) -> Self {
        PoolParticipant {
            participant_id: r.participant_id,
            pool_id: r.pool_id,
            profile_id: r.profile_id,
            selections_complete: r.selections_complete,
            joined_at: r.joined_at,
        }
    }
}

#[derive(FromRow)]
struct EntryRow {
    #[sqlx(flatten)]
    participant: ParticipantRow,
    display_name: String,
    user_id: Uuid,
}

const POOL_COLUMNS: &str = "pool_id, pool_name, pool_description, created_by, season_year, \
     entry_fee, max_participants, registration_deadline, is_active, created_at, updated_at";

const PARTICIPANT_COLUMNS: &str =
    "participant_id, pool_id, profile_id, selections_complete, joined_at";

#[async_trait]
impl PoolsRepository for PostgresPoolsRepository {
    async fn create_pool(&self, pool: &Pool, creator: &PoolParticipant) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin pool transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO pools (
                pool_id, pool_name, pool_description, created_by, season_year,
                entry_fee, max_participants, registration_deadline, is_active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(pool.pool_id)
        .bind(&pool.pool_name)
        .bind(&pool.pool_description)
        .bind(pool.created_by)
        .bind(pool.season_year)
        .bind(pool.entry_fee)
        .bind(pool.max_participants)
        .bind(pool.registration_deadline)
        .bind(pool.is_active)
        .bind(pool.created_at)
        .bind(pool.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("insert pool"))?;

        sqlx::query(
            r#"
            INSERT INTO pool_participants (participant_id, pool_id, profile_id, selections_complete, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(creator.participant_id)
        .bind(creator.pool_id)
        .bind(creator.profile_id)
        .bind(creator.selections_complete)
        .bind(creator.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("enroll pool creator"))?;

        tx.commit()
            .await
            .map_err(map_db_error("commit pool transaction"))?;

        info!(pool_id = %pool.pool_id, name = %pool.pool_name, "created pool");
        Ok(())
    }

    async fn get_pool(&self, pool_id: Uuid) -> Result<Option<Pool>> {
        let row: Option<PoolRow> =
            sqlx::query_as(&format!("SELECT {POOL_COLUMNS} FROM pools WHERE pool_id = $1"))
                .bind(pool_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error("get pool"))?;
        Ok(row.map(Pool::from))
    }

    async fn list_active_pools(&self) -> Result<Vec<Pool>> {
        let rows: Vec<PoolRow> = sqlx::query_as(&format!(
            "SELECT {POOL_COLUMNS} FROM pools WHERE is_active ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list active pools"))?;
        Ok(rows.into_iter().map(Pool::from).collect())
    }

    async fn list_pools_for_season(&self, season_year: i32) -> Result<Vec<Pool>> {
        let rows: Vec<PoolRow> = sqlx::query_as(&format!(
            "SELECT {POOL_COLUMNS} FROM pools WHERE season_year = $1 ORDER BY created_at"
        ))
        .bind(season_year)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list season pools"))?;
        Ok(rows.into_iter().map(Pool::from).collect())
    }

    async fn delete_pool(&self, pool_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM pools WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error("delete pool"))?;

        if result.rows_affected() == 0 {
            return Err(HuddleError::NotFound("Pool not found".to_string()));
        }
        info!(%pool_id, "deleted pool");
        Ok(())
    }

    async fn add_participant(&self, participant: &PoolParticipant) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin join transaction"))?;

        // Row lock serializes concurrent joins against the capacity check.
        let capacity: Option<i32> = sqlx::query_scalar(
            "SELECT max_participants FROM pools WHERE pool_id = $1 FOR UPDATE",
        )
        .bind(participant.pool_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error("lock pool"))?;
        let capacity =
            capacity.ok_or_else(|| HuddleError::NotFound("Pool not found".to_string()))?;

        let joined: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pool_participants WHERE pool_id = $1")
                .bind(participant.pool_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error("count participants"))?;
        if joined >= i64::from(capacity) {
            return Err(HuddleError::Conflict("Pool is full".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO pool_participants (participant_id, pool_id, profile_id, selections_complete, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(participant.participant_id)
        .bind(participant.pool_id)
        .bind(participant.profile_id)
        .bind(participant.selections_complete)
        .bind(participant.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("insert participant"))?;

        tx.commit()
            .await
            .map_err(map_db_error("commit join transaction"))?;
        Ok(())
    }

    async fn get_participant(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Option<PoolParticipant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM pool_participants \
             WHERE pool_id = $1 AND profile_id = $2"
        ))
        .bind(pool_id)
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("get participant"))?;
        Ok(row.map(PoolParticipant::from))
    }

    async fn list_entries(&self, pool_id: Uuid) -> Result<Vec<PoolEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT pp.participant_id, pp.pool_id, pp.profile_id, pp.selections_complete,
                   pp.joined_at, p.display_name, p.user_id
            FROM pool_participants pp
            JOIN profiles p ON p.profile_id = pp.profile_id
            WHERE pp.pool_id = $1
            ORDER BY pp.joined_at, pp.participant_id
            "#,
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list pool entries"))?;

        Ok(rows
            .into_iter()
            .map(|r| PoolEntry {
                participant: r.participant.into(),
                display_name: r.display_name,
                user_id: r.user_id,
            })
            .collect())
    }

    async fn list_memberships(&self, profile_id: Uuid) -> Result<Vec<PoolParticipant>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM pool_participants \
             WHERE profile_id = $1 ORDER BY joined_at"
        ))
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list memberships"))?;
        Ok(rows.into_iter().map(PoolParticipant::from).collect())
    }

    async fn count_participants(&self, pool_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM pool_participants WHERE pool_id = $1")
            .bind(pool_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("count participants"))
    }
}

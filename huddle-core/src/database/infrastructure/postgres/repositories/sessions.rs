use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::sessions::SessionsRepository;
use crate::domain::users::auth::AuthSession;
use crate::error::{HuddleError, Result};

#[derive(Clone, Debug)]
pub struct PostgresSessionsRepository {
    pool: PgPool,
}

impl PostgresSessionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    access_token_hash: String,
    refresh_token_hash: String,
    access_expires_at: DateTime<Utc>,
    refresh_expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<SessionRow> for AuthSession {
    fn from(r: SessionRow) -> Self {
        AuthSession {
            session_id: r.session_id,
            user_id: r.user_id,
            access_token_hash: r.access_token_hash,
            refresh_token_hash: r.refresh_token_hash,
            access_expires_at: r.access_expires_at,
            refresh_expires_at: r.refresh_expires_at,
            created_at: r.created_at,
            revoked_at: r.revoked_at,
        }
    }
}

const SESSION_COLUMNS: &str = "session_id, user_id, access_token_hash, refresh_token_hash, \
     access_expires_at, refresh_expires_at, created_at, revoked_at";

impl PostgresSessionsRepository {
    async fn find_by(&self, column: &str, hash: &str) -> Result<Option<AuthSession>> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM auth_sessions WHERE {column} = $1"
        ))
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("find session"))?;
        Ok(row.map(AuthSession::from))
    }
}

#[async_trait]
impl SessionsRepository for PostgresSessionsRepository {
    async fn create_session(&self, session: &AuthSession) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id, user_id, access_token_hash, refresh_token_hash,
                access_expires_at, refresh_expires_at, created_at, revoked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id)
        .bind(&session.access_token_hash)
        .bind(&session.refresh_token_hash)
        .bind(session.access_expires_at)
        .bind(session.refresh_expires_at)
        .bind(session.created_at)
        .bind(session.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("create session"))?;
        Ok(())
    }

    async fn find_by_access_hash(&self, hash: &str) -> Result<Option<AuthSession>> {
        self.find_by("access_token_hash", hash).await
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<AuthSession>> {
        self.find_by("refresh_token_hash", hash).await
    }

    async fn rotate_tokens(&self, rotated: &AuthSession) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE auth_sessions
            SET access_token_hash = $2,
                refresh_token_hash = $3,
                access_expires_at = $4,
                refresh_expires_at = $5
            WHERE session_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(rotated.session_id)
        .bind(&rotated.access_token_hash)
        .bind(&rotated.refresh_token_hash)
        .bind(rotated.access_expires_at)
        .bind(rotated.refresh_expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("rotate session tokens"))?;

        if result.rows_affected() == 0 {
            return Err(HuddleError::Unauthorized("Session is no longer valid".to_string()));
        }
        Ok(())
    }

    async fn revoke_session(&self, session_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE auth_sessions SET revoked_at = $2 WHERE session_id = $1 AND revoked_at IS NULL",
        )
        .bind(session_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("revoke session"))?;
        Ok(())
    }

    async fn revoke_user_sessions(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET revoked_at = $2 WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("revoke user sessions"))?;
        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM auth_sessions WHERE refresh_expires_at <= $1 OR revoked_at IS NOT NULL",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("purge expired sessions"))?;
        Ok(result.rows_affected())
    }
}

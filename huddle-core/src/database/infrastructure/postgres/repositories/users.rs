use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::users::UsersRepository;
use crate::domain::users::{Profile, User};
use crate::error::{HuddleError, Result};

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            user_id: r.user_id,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            is_active: r.is_active,
            email_verified: r.email_verified,
            created_at: r.created_at,
            updated_at: r.updated_at,
            last_login_at: r.last_login_at,
        }
    }
}

const USER_COLUMNS: &str = "user_id, email, first_name, last_name, is_active, \
     email_verified, created_at, updated_at, last_login_at";

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn create_user_with_profile(
        &self,
        user: &User,
        password_hash: &str,
        profile: &Profile,
    ) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(map_db_error("begin user transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, email, password_hash, first_name, last_name,
                is_active, email_verified, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("insert user"))?;

        sqlx::query(
            r#"
            INSERT INTO profiles (profile_id, user_id, profile_name, display_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(profile.profile_id)
        .bind(profile.user_id)
        .bind(&profile.profile_name)
        .bind(&profile.display_name)
        .bind(profile.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("insert default profile"))?;

        tx.commit()
            .await
            .map_err(map_db_error("commit user transaction"))?;

        info!(user_id = %user.user_id, "created user account");
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error("get user by id"))?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error("get user by email"))?;
        Ok(row.map(User::from))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>> {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error("get password hash"))
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(at)
        .execute(self.pool())
        .await
        .map_err(map_db_error("update password"))?;

        if result.rows_affected() == 0 {
            return Err(HuddleError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(at)
            .execute(self.pool())
            .await
            .map_err(map_db_error("record login"))?;
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(map_db_error("delete user"))?;

        if result.rows_affected() == 0 {
            return Err(HuddleError::NotFound("User not found".to_string()));
        }
        info!(%user_id, "deleted user account");
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::profiles::ProfilesRepository;
use crate::domain::users::Profile;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct PostgresProfilesRepository {
    pool: PgPool,
}

impl PostgresProfilesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProfileRow {
    profile_id: Uuid,
    user_id: Uuid,
    profile_name: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Profile {
            profile_id: r.profile_id,
            user_id: r.user_id,
            profile_name: r.profile_name,
            display_name: r.display_name,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ProfilesRepository for PostgresProfilesRepository {
    async fn create_profile(&self, profile: &Profile) -> Result<()> {
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
        .execute(&self.pool)
        .await
        .map_err(map_db_error("create profile"))?;
        Ok(())
    }

    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT profile_id, user_id, profile_name, display_name, created_at
            FROM profiles
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("get profile"))?;
        Ok(row.map(Profile::from))
    }

    async fn list_profiles_for_user(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        let rows: Vec<ProfileRow> = sqlx::query_as(
            r#"
            SELECT profile_id, user_id, profile_name, display_name, created_at
            FROM profiles
            WHERE user_id = $1
            ORDER BY created_at, profile_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list profiles"))?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }
}

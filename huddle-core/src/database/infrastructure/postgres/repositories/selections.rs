use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::selections::SelectionsRepository;
use crate::domain::pools::TeamSelection;
use crate::error::{HuddleError, Result};

#[derive(Clone, Debug)]
pub struct PostgresSelectionsRepository {
    pool: PgPool,
}

impl PostgresSelectionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SelectionRow {
    selection_id: Uuid,
    pool_id: Uuid,
    profile_id: Uuid,
    team_id: Uuid,
    selection_order: i32,
    created_at: DateTime<Utc>,
}

impl From<SelectionRow> for TeamSelection {
    fn from(r: SelectionRow) -> Self {
        TeamSelection {
            selection_id: r.selection_id,
            pool_id: r.pool_id,
            profile_id: r.profile_id,
            team_id: r.team_id,
            selection_order: r.selection_order,
            created_at: r.created_at,
        }
    }
}

const SELECTION_COLUMNS: &str =
    "selection_id, pool_id, profile_id, team_id, selection_order, created_at";

impl PostgresSelectionsRepository {
    async fn set_complete(
        tx: &mut sqlx::PgConnection,
        pool_id: Uuid,
        profile_id: Uuid,
        complete: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE pool_participants SET selections_complete = $3
            WHERE pool_id = $1 AND profile_id = $2
            "#,
        )
        .bind(pool_id)
        .bind(profile_id)
        .bind(complete)
        .execute(tx)
        .await
        .map_err(map_db_error("update selections_complete"))?;

        if result.rows_affected() == 0 {
            return Err(HuddleError::NotFound(
                "Profile has not joined this pool".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SelectionsRepository for PostgresSelectionsRepository {
    async fn replace_selections(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
        selections: &[TeamSelection],
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin draft transaction"))?;

        sqlx::query("DELETE FROM team_selections WHERE pool_id = $1 AND profile_id = $2")
            .bind(pool_id)
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("clear previous draft"))?;

        for selection in selections {
            sqlx::query(
                r#"
                INSERT INTO team_selections (
                    selection_id, pool_id, profile_id, team_id, selection_order, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(selection.selection_id)
            .bind(selection.pool_id)
            .bind(selection.profile_id)
            .bind(selection.team_id)
            .bind(selection.selection_order)
            .bind(selection.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("insert selection"))?;
        }

        Self::set_complete(&mut *tx, pool_id, profile_id, !selections.is_empty()).await?;

        tx.commit()
            .await
            .map_err(map_db_error("commit draft transaction"))?;
        Ok(())
    }

    async fn clear_selections(&self, pool_id: Uuid, profile_id: Uuid) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin clear transaction"))?;

        sqlx::query("DELETE FROM team_selections WHERE pool_id = $1 AND profile_id = $2")
            .bind(pool_id)
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("clear draft"))?;

        Self::set_complete(&mut *tx, pool_id, profile_id, false).await?;

        tx.commit()
            .await
            .map_err(map_db_error("commit clear transaction"))?;
        Ok(())
    }

    async fn list_for_entry(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Vec<TeamSelection>> {
        let rows: Vec<SelectionRow> = sqlx::query_as(&format!(
            "SELECT {SELECTION_COLUMNS} FROM team_selections \
             WHERE pool_id = $1 AND profile_id = $2 ORDER BY selection_order"
        ))
        .bind(pool_id)
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list entry selections"))?;
        Ok(rows.into_iter().map(TeamSelection::from).collect())
    }

    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<TeamSelection>> {
        let rows: Vec<SelectionRow> = sqlx::query_as(&format!(
            "SELECT {SELECTION_COLUMNS} FROM team_selections \
             WHERE pool_id = $1 ORDER BY profile_id, selection_order"
        ))
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list pool selections"))?;
        Ok(rows.into_iter().map(TeamSelection::from).collect())
    }

    async fn count_for_profile(&self, profile_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM team_selections WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("count profile selections"))
    }
}

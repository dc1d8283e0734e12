use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::scores::ScoresRepository;
use crate::domain::pools::PoolScore;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct PostgresScoresRepository {
    pool: PgPool,
}

impl PostgresScoresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ScoreRow {
    score_id: Uuid,
    pool_id: Uuid,
    profile_id: Uuid,
    week_id: Uuid,
    points_earned: i32,
    total_points: i32,
    rank_position: Option<i32>,
    calculated_at: DateTime<Utc>,
}

impl From<ScoreRow> for PoolScore {
    fn from(r: ScoreRow) -> Self {
        PoolScore {
            score_id: r.score_id,
            pool_id: r.pool_id,
            profile_id: r.profile_id,
            week_id: r.week_id,
            points_earned: r.points_earned,
            total_points: r.total_points,
            rank_position: r.rank_position,
            calculated_at: r.calculated_at,
        }
    }
}

// Week order comes from the joined calendar, not from score insertion time.
const SCORE_SELECT: &str = r#"
    SELECT s.score_id, s.pool_id, s.profile_id, s.week_id, s.points_earned,
           s.total_points, s.rank_position, s.calculated_at
    FROM pool_scores s
    JOIN nfl_weeks w ON w.week_id = s.week_id
"#;

#[async_trait]
impl ScoresRepository for PostgresScoresRepository {
    async fn replace_pool_scores(&self, pool_id: Uuid, scores: &[PoolScore]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin score transaction"))?;

        sqlx::query("DELETE FROM pool_scores WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("clear pool scores"))?;

        for score in scores {
            sqlx::query(
                r#"
                INSERT INTO pool_scores (
                    score_id, pool_id, profile_id, week_id, points_earned,
                    total_points, rank_position, calculated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(score.score_id)
            .bind(score.pool_id)
            .bind(score.profile_id)
            .bind(score.week_id)
            .bind(score.points_earned)
            .bind(score.total_points)
            .bind(score.rank_position)
            .bind(score.calculated_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("insert pool score"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("commit score transaction"))?;
        debug!(%pool_id, rows = scores.len(), "replaced pool scores");
        Ok(())
    }

    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<PoolScore>> {
        let rows: Vec<ScoreRow> = sqlx::query_as(&format!(
            "{SCORE_SELECT} WHERE s.pool_id = $1 ORDER BY w.week_number, s.rank_position NULLS LAST"
        ))
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list pool scores"))?;
        Ok(rows.into_iter().map(PoolScore::from).collect())
    }

    async fn list_for_entry(&self, pool_id: Uuid, profile_id: Uuid) -> Result<Vec<PoolScore>> {
        let rows: Vec<ScoreRow> = sqlx::query_as(&format!(
            "{SCORE_SELECT} WHERE s.pool_id = $1 AND s.profile_id = $2 ORDER BY w.week_number"
        ))
        .bind(pool_id)
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list entry scores"))?;
        Ok(rows.into_iter().map(PoolScore::from).collect())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::infrastructure::postgres::map_db_error;
use crate::database::ports::nfl::NflRepository;
use crate::domain::nfl::{Game, GameStatus, Season, Team, TeamPerformance, Week};
use crate::error::{HuddleError, Result};

#[derive(Clone, Debug)]
pub struct PostgresNflRepository {
    pool: PgPool,
}

impl PostgresNflRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TeamRow {
    team_id: Uuid,
    team_code: String,
    team_name: String,
    team_city: String,
    conference: String,
    division: String,
    points: i32,
    is_active: bool,
}

impl TryFrom<TeamRow> for Team {
    type Error = HuddleError;

    fn try_from(r: TeamRow) -> Result<Self> {
        Ok(Team {
            team_id: r.team_id,
            conference: r.conference.parse().map_err(HuddleError::Internal)?,
            division: r.division.parse().map_err(HuddleError::Internal)?,
            team_code: r.team_code,
            team_name: r.team_name,
            team_city: r.team_city,
            points: r.points,
            is_active: r.is_active,
        })
    }
}

#[derive(FromRow)]
struct SeasonRow {
    season_id: Uuid,
    season_year: i32,
    regular_season_weeks: i32,
    is_current: bool,
}

impl From<SeasonRow> for Season {
    fn from(r: SeasonRow) -> Self {
        Season {
            season_id: r.season_id,
            season_year: r.season_year,
            regular_season_weeks: r.regular_season_weeks,
            is_current: r.is_current,
        }
    }
}

#[derive(FromRow)]
struct WeekRow {
    week_id: Uuid,
    season_id: Uuid,
    week_number: i32,
    week_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<WeekRow> for Week {
    fn from(r: WeekRow) -> Self {
        Week {
            week_id: r.week_id,
            season_id: r.season_id,
            week_number: r.week_number,
            week_type: r.week_type,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(FromRow)]
struct GameRow {
    game_id: Uuid,
    season_id: Uuid,
    week_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    game_date: DateTime<Utc>,
    home_score: Option<i32>,
    away_score: Option<i32>,
    game_status: String,
}

impl TryFrom<GameRow> for Game {
    type Error = HuddleError;

    fn try_from(r: GameRow) -> Result<Self> {
        Ok(Game {
            game_id: r.game_id,
            season_id: r.season_id,
            week_id: r.week_id,
            home_team_id: r.home_team_id,
            away_team_id: r.away_team_id,
            game_date: r.game_date,
            home_score: r.home_score,
            away_score: r.away_score,
            game_status: r.game_status.parse().map_err(HuddleError::Internal)?,
        })
    }
}

#[derive(FromRow)]
struct PerformanceRow {
    performance_id: Uuid,
    team_id: Uuid,
    season_id: Uuid,
    games_played: i32,
    wins: i32,
    losses: i32,
    ties: i32,
    points_for: i32,
    points_against: i32,
    win_percentage: f64,
    playoff_made: bool,
    performance_score: f64,
    updated_at: DateTime<Utc>,
}

impl From<PerformanceRow> for TeamPerformance {
    fn from(r: PerformanceRow) -> Self {
        TeamPerformance {
            performance_id: r.performance_id,
            team_id: r.team_id,
            season_id: r.season_id,
            games_played: r.games_played,
            wins: r.wins,
            losses: r.losses,
            ties: r.ties,
            points_for: r.points_for,
            points_against: r.points_against,
            win_percentage: r.win_percentage,
            playoff_made: r.playoff_made,
            performance_score: r.performance_score,
            updated_at: r.updated_at,
        }
    }
}

const SEASON_COLUMNS: &str = "season_id, season_year, regular_season_weeks, is_current";
const GAME_COLUMNS: &str = "game_id, season_id, week_id, home_team_id, away_team_id, \
     game_date, home_score, away_score, game_status";

#[async_trait]
impl NflRepository for PostgresNflRepository {
    async fn upsert_teams(&self, teams: &[Team]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin team upsert"))?;

        for team in teams {
            sqlx::query(
                r#"
                INSERT INTO nfl_teams (
                    team_id, team_code, team_name, team_city, conference,
                    division, points, is_active
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (team_code) DO UPDATE SET
                    team_name = EXCLUDED.team_name,
                    team_city = EXCLUDED.team_city,
                    conference = EXCLUDED.conference,
                    division = EXCLUDED.division,
                    points = EXCLUDED.points,
                    is_active = EXCLUDED.is_active
                "#,
            )
            .bind(team.team_id)
            .bind(&team.team_code)
            .bind(&team.team_name)
            .bind(&team.team_city)
            .bind(team.conference.as_str())
            .bind(team.division.as_str())
            .bind(team.points)
            .bind(team.is_active)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("upsert team"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("commit team upsert"))?;
        debug!(count = teams.len(), "upserted NFL teams");
        Ok(())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let rows: Vec<TeamRow> = sqlx::query_as(
            r#"
            SELECT team_id, team_code, team_name, team_city, conference,
                   division, points, is_active
            FROM nfl_teams
            ORDER BY conference, division, team_city
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list teams"))?;
        rows.into_iter().map(Team::try_from).collect()
    }

    async fn count_teams(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM nfl_teams")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("count teams"))
    }

    async fn create_season(&self, season: &Season, weeks: &[Week]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin season transaction"))?;

        if season.is_current {
            sqlx::query("UPDATE nfl_seasons SET is_current = FALSE WHERE is_current")
                .execute(&mut *tx)
                .await
                .map_err(map_db_error("demote current season"))?;
        }

        sqlx::query(
            r#"
            INSERT INTO nfl_seasons (season_id, season_year, regular_season_weeks, is_current)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(season.season_id)
        .bind(season.season_year)
        .bind(season.regular_season_weeks)
        .bind(season.is_current)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error("insert season"))?;

        for week in weeks {
            sqlx::query(
                r#"
                INSERT INTO nfl_weeks (week_id, season_id, week_number, week_type, start_date, end_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(week.week_id)
            .bind(week.season_id)
            .bind(week.week_number)
            .bind(&week.week_type)
            .bind(week.start_date)
            .bind(week.end_date)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("insert week"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("commit season transaction"))?;
        info!(year = season.season_year, weeks = weeks.len(), "created NFL season");
        Ok(())
    }

    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>> {
        let row: Option<SeasonRow> = sqlx::query_as(&format!(
            "SELECT {SEASON_COLUMNS} FROM nfl_seasons WHERE season_id = $1"
        ))
        .bind(season_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("get season"))?;
        Ok(row.map(Season::from))
    }

    async fn get_season_by_year(&self, season_year: i32) -> Result<Option<Season>> {
        let row: Option<SeasonRow> = sqlx::query_as(&format!(
            "SELECT {SEASON_COLUMNS} FROM nfl_seasons WHERE season_year = $1"
        ))
        .bind(season_year)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("get season by year"))?;
        Ok(row.map(Season::from))
    }

    async fn get_current_season(&self) -> Result<Option<Season>> {
        let row: Option<SeasonRow> = sqlx::query_as(&format!(
            "SELECT {SEASON_COLUMNS} FROM nfl_seasons WHERE is_current \
             ORDER BY season_year DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("get current season"))?;
        Ok(row.map(Season::from))
    }

    async fn list_weeks(&self, season_id: Uuid) -> Result<Vec<Week>> {
        let rows: Vec<WeekRow> = sqlx::query_as(
            r#"
            SELECT week_id, season_id, week_number, week_type, start_date, end_date
            FROM nfl_weeks
            WHERE season_id = $1
            ORDER BY week_number
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list weeks"))?;
        Ok(rows.into_iter().map(Week::from).collect())
    }

    async fn insert_games(&self, games: &[Game]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin schedule transaction"))?;

        for game in games {
            sqlx::query(&format!(
                "INSERT INTO nfl_games ({GAME_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ))
            .bind(game.game_id)
            .bind(game.season_id)
            .bind(game.week_id)
            .bind(game.home_team_id)
            .bind(game.away_team_id)
            .bind(game.game_date)
            .bind(game.home_score)
            .bind(game.away_score)
            .bind(game.game_status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("insert game"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("commit schedule transaction"))?;
        debug!(count = games.len(), "inserted games");
        Ok(())
    }

    async fn get_game(&self, game_id: Uuid) -> Result<Option<Game>> {
        let row: Option<GameRow> =
            sqlx::query_as(&format!("SELECT {GAME_COLUMNS} FROM nfl_games WHERE game_id = $1"))
                .bind(game_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error("get game"))?;
        row.map(Game::try_from).transpose()
    }

    async fn list_games(&self, season_id: Uuid) -> Result<Vec<Game>> {
        let rows: Vec<GameRow> = sqlx::query_as(&format!(
            "SELECT {GAME_COLUMNS} FROM nfl_games WHERE season_id = $1 ORDER BY game_date, game_id"
        ))
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list games"))?;
        rows.into_iter().map(Game::try_from).collect()
    }

    async fn record_result(
        &self,
        game_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<Game> {
        let row: Option<GameRow> = sqlx::query_as(&format!(
            "UPDATE nfl_games SET home_score = $2, away_score = $3, game_status = $4 \
             WHERE game_id = $1 RETURNING {GAME_COLUMNS}"
        ))
        .bind(game_id)
        .bind(home_score)
        .bind(away_score)
        .bind(GameStatus::Completed.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("record game result"))?;

        row.map(Game::try_from)
            .transpose()?
            .ok_or_else(|| HuddleError::NotFound("Game not found".to_string()))
    }

    async fn save_team_performance(&self, records: &[TeamPerformance]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("begin performance upsert"))?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO team_performance (
                    performance_id, team_id, season_id, games_played, wins, losses, ties,
                    points_for, points_against, win_percentage, playoff_made,
                    performance_score, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (team_id, season_id) DO UPDATE SET
                    games_played = EXCLUDED.games_played,
                    wins = EXCLUDED.wins,
                    losses = EXCLUDED.losses,
                    ties = EXCLUDED.ties,
                    points_for = EXCLUDED.points_for,
                    points_against = EXCLUDED.points_against,
                    win_percentage = EXCLUDED.win_percentage,
                    playoff_made = EXCLUDED.playoff_made,
                    performance_score = EXCLUDED.performance_score,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(record.performance_id)
            .bind(record.team_id)
            .bind(record.season_id)
            .bind(record.games_played)
            .bind(record.wins)
            .bind(record.losses)
            .bind(record.ties)
            .bind(record.points_for)
            .bind(record.points_against)
            .bind(record.win_percentage)
            .bind(record.playoff_made)
            .bind(record.performance_score)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("upsert team performance"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("commit performance upsert"))?;
        Ok(())
    }

    async fn list_team_performance(&self, season_id: Uuid) -> Result<Vec<TeamPerformance>> {
        let rows: Vec<PerformanceRow> = sqlx::query_as(
            r#"
            SELECT performance_id, team_id, season_id, games_played, wins, losses, ties,
                   points_for, points_against, win_percentage, playoff_made,
                   performance_score, updated_at
            FROM team_performance
            WHERE season_id = $1
            ORDER BY performance_score DESC, win_percentage DESC
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("list team performance"))?;
        Ok(rows.into_iter().map(TeamPerformance::from).collect())
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::nfl::{Game, Season, Team, TeamPerformance, Week};
use crate::error::Result;

#[async_trait]
pub trait NflRepository: Send + Sync {
    /// Insert or update teams keyed by `team_code`.
    async fn upsert_teams(&self, teams: &[Team]) -> Result<()>;
    /// Ordered by conference, division, city.
    async fn list_teams(&self) -> Result<Vec<Team>>;
    async fn count_teams(&self) -> Result<i64>;

    /// Insert a season with its weeks. A current season demotes any other.
    async fn create_season(&self, season: &Season, weeks: &[Week]) -> Result<()>;
    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>>;
    async fn get_season_by_year(&self, season_year: i32) -> Result<Option<Season>>;
    async fn get_current_season(&self) -> Result<Option<Season>>;
    /// Ordered by week number.
    async fn list_weeks(&self, season_id: Uuid) -> Result<Vec<Week>>;

    async fn insert_games(&self, games: &[Game]) -> Result<()>;
    async fn get_game(&self, game_id: Uuid) -> Result<Option<Game>>;
    /// Ordered by kickoff.
    async fn list_games(&self, season_id: Uuid) -> Result<Vec<Game>>;
    /// Store final scores and mark the game completed.
    async fn record_result(
        &self,
        game_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<Game>;

    /// Upsert keyed by `(team_id, season_id)`.
    async fn save_team_performance(&self, records: &[TeamPerformance]) -> Result<()>;
    async fn list_team_performance(&self, season_id: Uuid) -> Result<Vec<TeamPerformance>>;
}

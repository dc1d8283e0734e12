use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::{Game, GameOutcome};

/// Wins needed to count a team as a playoff team.
pub const PLAYOFF_WINS: i32 = 10;
const SCORE_PER_WIN: f64 = 5.88;
const PLAYOFF_BONUS: f64 = 15.0;

/// Season-aggregated record of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    pub performance_id: Uuid,
    pub team_id: Uuid,
    pub season_id: Uuid,
    pub games_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub points_for: i32,
    pub points_against: i32,
    pub win_percentage: f64,
    pub playoff_made: bool,
    pub performance_score: f64,
    pub updated_at: DateTime<Utc>,
}

impl TeamPerformance {
    pub fn empty(team_id: Uuid, season_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            performance_id: Uuid::now_v7(),
            team_id,
            season_id,
            games_played: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
            win_percentage: 0.0,
            playoff_made: false,
            performance_score: 0.0,
            updated_at: now,
        }
    }

    /// Aggregate every final game of the season involving `team_id`.
    pub fn from_games<'a>(
        team_id: Uuid,
        season_id: Uuid,
        games: impl IntoIterator<Item = &'a Game>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut record = Self::empty(team_id, season_id, now);
        for game in games {
            if game.season_id != season_id {
                continue;
            }
            let (Some(outcome), Some((scored, allowed))) =
                (game.outcome_for(team_id), game.scores_for(team_id))
            else {
                continue;
            };
            record.games_played += 1;
            record.points_for += scored;
            record.points_against += allowed;
            match outcome {
                GameOutcome::Win => record.wins += 1,
                GameOutcome::Loss => record.losses += 1,
                GameOutcome::Tie => record.ties += 1,
            }
        }
        record.win_percentage =
            win_percentage(record.wins, record.ties, record.games_played);
        record.playoff_made = record.wins >= PLAYOFF_WINS;
        record.performance_score =
            performance_score(record.wins, record.playoff_made);
        record
    }

    /// "W-L" or "W-L-T" when ties exist.
    pub fn record_label(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Ties count as half a win; 0 when no games have been played.
pub fn win_percentage(wins: i32, ties: i32, games_played: i32) -> f64 {
    if games_played <= 0 {
        return 0.0;
    }
    let raw = (f64::from(wins) + f64::from(ties) / 2.0) / f64::from(games_played);
    round_to(raw, 3)
}

pub fn performance_score(wins: i32, playoff_made: bool) -> f64 {
    let bonus = if playoff_made { PLAYOFF_BONUS } else { 0.0 };
    round_to(f64::from(wins) * SCORE_PER_WIN + bonus, 3)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "SCHEDULED",
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(GameStatus::Scheduled),
            "IN_PROGRESS" => Ok(GameStatus::InProgress),
            "COMPLETED" => Ok(GameStatus::Completed),
            other => Err(format!("unknown game status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: Uuid,
    pub season_id: Uuid,
    pub week_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub game_date: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub game_status: GameStatus,
}

impl Game {
    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn is_final(&self) -> bool {
        self.game_status == GameStatus::Completed
            && self.home_score.is_some()
            && self.away_score.is_some()
    }

    /// Result from `team_id`'s perspective; `None` unless the game is final
    /// and the team played in it.
    pub fn outcome_for(&self, team_id: Uuid) -> Option<GameOutcome> {
        if !self.is_final() || !self.involves(team_id) {
            return None;
        }
        let (ours, theirs) = self.scores_for(team_id)?;
        Some(match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => GameOutcome::Win,
            std::cmp::Ordering::Less => GameOutcome::Loss,
            std::cmp::Ordering::Equal => GameOutcome::Tie,
        })
    }

    /// `(points_for, points_against)` for `team_id` once both scores exist.
    pub fn scores_for(&self, team_id: Uuid) -> Option<(i32, i32)> {
        let (home, away) = (self.home_score?, self.away_score?);
        if team_id == self.home_team_id {
            Some((home, away))
        } else if team_id == self.away_team_id {
            Some((away, home))
        } else {
            None
        }
    }
}

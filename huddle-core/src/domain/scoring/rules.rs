use serde::{Deserialize, Serialize};

use crate::domain::nfl::GameOutcome;

/// Points a drafted team earns its owner per final game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win_points: i32,
    pub tie_points: i32,
    pub loss_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win_points: 10,
            tie_points: 5,
            loss_points: 0,
        }
    }
}

impl ScoringRules {
    pub fn points_for(&self, outcome: GameOutcome) -> i32 {
        match outcome {
            GameOutcome::Win => self.win_points,
            GameOutcome::Tie => self.tie_points,
            GameOutcome::Loss => self.loss_points,
        }
    }
}

//! NFL reference data: teams, seasons, weeks, games and season records.

pub mod catalog;
pub mod game;
pub mod performance;
pub mod schedule;
pub mod season;
pub mod team;

pub use catalog::{NFL_TEAMS, TeamSeed};
pub use game::{Game, GameOutcome, GameStatus};
pub use performance::TeamPerformance;
pub use season::{Season, SeasonCalendar, Week};
pub use team::{Conference, Division, Team};

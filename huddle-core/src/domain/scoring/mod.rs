//! Weekly pool scoring and ranking.

pub mod engine;
pub mod rules;

pub use engine::{EntryPicks, competition_ranks, compute_pool_scores, weekly_points};
pub use rules::ScoringRules;

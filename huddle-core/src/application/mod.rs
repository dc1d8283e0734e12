//! Use-case services composed over the repository ports.

pub mod accounts;
pub mod dashboard;
pub mod draft;
pub mod pools;
pub mod profiles;
pub mod scoring;
pub mod seed;
pub mod unit_of_work;

#[cfg(test)]
pub(crate) mod test_support;

pub use accounts::{AccountService, AuthOutcome, AuthenticatedUser};
pub use dashboard::{Dashboard, DashboardService, SeasonOverview};
pub use draft::{ConferenceBoard, DraftService, EntrySelections};
pub use pools::{Membership, PoolDetail, PoolService, PoolSummary};
pub use profiles::ProfileService;
pub use scoring::{EntryProgress, GameResult, ScoringService, StandingRow, TeamReportRow};
pub use seed::{SeedOptions, SeedReport, Seeder, SimulationReport};

//! DTOs exchanged over HTTP.

pub mod requests;
pub mod responses;

pub use requests::{
    GameResultRequest, JoinPoolRequest, RefreshRequest, SaveSelectionsRequest, TeamReportQuery,
};
pub use responses::{ApiResponse, HealthResponse};

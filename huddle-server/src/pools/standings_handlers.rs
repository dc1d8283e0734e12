use axum::{
    Json,
    extract::{Path, Query, State},
};
use huddle_core::{
    api_types::{ApiResponse, TeamReportQuery},
    application::{EntryProgress, StandingRow, TeamReportRow},
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn standings(
    State(state): State<AppState>,
    Path(pool_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<StandingRow>>>> {
    let rows = state.scoring.standings(pool_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn weekly_standings(
    State(state): State<AppState>,
    Path(pool_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<EntryProgress>>>> {
    let progress = state.scoring.weekly_progress(pool_id).await?;
    Ok(Json(ApiResponse::success(progress)))
}

/// Most-drafted teams in the pool with their season record.
pub async fn team_report(
    State(state): State<AppState>,
    Path(pool_id): Path<Uuid>,
    Query(query): Query<TeamReportQuery>,
) -> AppResult<Json<ApiResponse<Vec<TeamReportRow>>>> {
    let rows = state.scoring.team_report(pool_id, query.limit()).await?;
    Ok(Json(ApiResponse::success(rows)))
}

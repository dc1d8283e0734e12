use axum::{Json, extract::State};
use chrono::Utc;
use huddle_core::{
    api_types::ApiResponse,
    application::{ConferenceBoard, SeasonOverview},
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// The draft board: every active team grouped by conference and division.
pub async fn teams(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ConferenceBoard>>>> {
    let board = state.draft.team_board().await?;
    Ok(Json(ApiResponse::success(board)))
}

pub async fn current_season(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SeasonOverview>>> {
    let overview = state
        .dashboard
        .current_season(Utc::now().date_naive())
        .await?
        .ok_or_else(|| AppError::not_found("No current season has been set up"))?;
    Ok(Json(ApiResponse::success(overview)))
}

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use huddle_core::{
    api_types::{ApiResponse, GameResultRequest},
    application::GameResult,
    domain::pools::PoolScore,
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};

/// Record a final score, refresh season records and rescore every pool of
/// the season.
pub async fn record_game_result(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<GameResultRequest>,
) -> AppResult<Json<ApiResponse<GameResult>>> {
    let result = state
        .scoring
        .record_game_result(game_id, request.home_score, request.away_score, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn recompute_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<PoolScore>>>> {
    let scores = state.scoring.recompute_pool(pool_id, Utc::now()).await?;
    Ok(Json(ApiResponse::success(scores)))
}

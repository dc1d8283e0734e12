use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use huddle_core::{
    api_types::{ApiResponse, JoinPoolRequest},
    application::{AuthenticatedUser, PoolDetail, PoolSummary},
    domain::pools::{CreatePoolRequest, PoolParticipant},
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn create_pool(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePoolRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PoolSummary>>)> {
    let pool = state
        .pools
        .create_pool(auth.user.user_id, request, Utc::now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(pool).with_message("Pool created successfully")),
    ))
}

pub async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PoolDetail>>> {
    let detail = state.pools.pool_detail(pool_id, Utc::now()).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Creator-only; cascades to participants, selections and scores.
pub async fn delete_pool(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(pool_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.pools.delete_pool(auth.user.user_id, pool_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_pool(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(pool_id): Path<Uuid>,
    Json(request): Json<JoinPoolRequest>,
) -> AppResult<Json<ApiResponse<PoolParticipant>>> {
    let participant = state
        .pools
        .join_pool(auth.user.user_id, pool_id, request.profile_id, Utc::now())
        .await?;
    Ok(Json(
        ApiResponse::success(participant).with_message("Joined pool"),
    ))
}

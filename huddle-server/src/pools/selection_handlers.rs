use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use huddle_core::{
    api_types::{ApiResponse, SaveSelectionsRequest},
    application::{AuthenticatedUser, EntrySelections},
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn get_selections(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((pool_id, profile_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<EntrySelections>>> {
    let entry = state
        .draft
        .entry_selections(auth.user.user_id, pool_id, profile_id, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// Replace the entry's draft with exactly four teams, in pick order.
pub async fn save_selections(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((pool_id, profile_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SaveSelectionsRequest>,
) -> AppResult<Json<ApiResponse<EntrySelections>>> {
    let entry = state
        .draft
        .save_selections(
            auth.user.user_id,
            pool_id,
            profile_id,
            request.team_ids,
            Utc::now(),
        )
        .await?;
    Ok(Json(
        ApiResponse::success(entry).with_message("Team selections saved successfully"),
    ))
}

pub async fn clear_selections(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((pool_id, profile_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state
        .draft
        .clear_selections(auth.user.user_id, pool_id, profile_id, Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use huddle_core::{
    api_types::ApiResponse,
    application::{AuthenticatedUser, Dashboard, Membership, PoolSummary},
    domain::users::{NewProfile, Profile},
};
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Profile>>>> {
    let profiles = state.profiles.list_profiles(auth.user.user_id).await?;
    Ok(Json(ApiResponse::success(profiles)))
}

pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<NewProfile>,
) -> AppResult<(StatusCode, Json<ApiResponse<Profile>>)> {
    let profile = state
        .profiles
        .create_profile(auth.user.user_id, request, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile))))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let dashboard = state
        .dashboard
        .dashboard(auth.user.user_id, profile_id, Utc::now().date_naive())
        .await?;
    Ok(Json(ApiResponse::success(dashboard)))
}

/// Pools the profile has joined, with its draft in each.
pub async fn my_pools(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Membership>>>> {
    let pools = state.pools.my_pools(auth.user.user_id, profile_id).await?;
    Ok(Json(ApiResponse::success(pools)))
}

pub async fn available_pools(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<PoolSummary>>>> {
    let pools = state
        .pools
        .available_pools(auth.user.user_id, profile_id, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(pools)))
}

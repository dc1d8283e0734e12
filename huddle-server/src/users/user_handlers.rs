use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use huddle_core::{
    api_types::ApiResponse,
    application::AuthenticatedUser,
    domain::users::{ChangePasswordRequest, Profile, User},
};
use serde::Serialize;
use tracing::info;

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user: User,
    pub profiles: Vec<Profile>,
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<CurrentUser>>> {
    let profiles = state.profiles.list_profiles(auth.user.user_id).await?;
    Ok(Json(ApiResponse::success(CurrentUser {
        user: auth.user,
        profiles,
    })))
}

/// Change the caller's password. Every session of the user is revoked,
/// including the one used for this request.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .accounts
        .change_password(auth.user.user_id, request, Utc::now())
        .await?;
    info!(user_id = %auth.user.user_id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

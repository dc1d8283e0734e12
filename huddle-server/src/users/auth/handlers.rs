use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use huddle_core::{
    api_types::{ApiResponse, RefreshRequest},
    application::AuthOutcome,
    domain::users::{LoginRequest, RegisterRequest, auth::IssuedTokens},
};

use super::middleware::extract_bearer_token;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthOutcome>>> {
    let outcome = state.accounts.register(request, Utc::now()).await?;
    Ok(Json(
        ApiResponse::success(outcome).with_message("Account created successfully"),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthOutcome>>> {
    let outcome = state.accounts.login(request, Utc::now()).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<IssuedTokens>>> {
    let tokens = state
        .accounts
        .refresh(&request.refresh_token, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(tokens)))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
    state.accounts.logout(token, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}

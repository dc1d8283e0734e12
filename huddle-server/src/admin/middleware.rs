use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;
use tracing::warn;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};
use crate::users::auth::extract_bearer_token;

pub const SERVICE_KEY_HEADER: &str = "x-service-key";

/// Admit the request only when it presents the configured service key,
/// either in `X-Service-Key` or as a bearer token.
pub async fn service_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let Some(expected) = state.service_key.as_deref() else {
        warn!(path = %request.uri().path(), "admin request rejected: no service key configured");
        return Err(AppError::forbidden("Admin endpoints are disabled"));
    };

    let matched = presented_key(request.headers())
        .map(|key| constant_time_eq(key.as_bytes(), expected.as_bytes()));
    match matched {
        Some(true) => Ok(next.run(request).await),
        Some(false) => Err(AppError::forbidden("Invalid service key")),
        None => Err(AppError::unauthorized("Service key required")),
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SERVICE_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .or_else(|| extract_bearer_token(headers))
}

pub mod v1;

use axum::{Router, routing::get};
use huddle_core::api::routes::{HEALTH, PING};

use crate::{
    AppState,
    health::{health_handler, ping_handler},
};

/// Create the main API router with all versions
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/v1", v1::create_v1_router(state))
}

/// Liveness endpoints plus every API version; transport layers (CORS,
/// tracing) are added by the binary.
pub fn create_app_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(PING, get(ping_handler))
        .route(HEALTH, get(health_handler))
        .merge(create_api_router(state))
}

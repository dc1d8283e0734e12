use axum::{Json, extract::State, http::StatusCode};
use huddle_core::api_types::HealthResponse;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("ping");
    Json(json!({
        "status": "ok",
        "message": "Family Huddle is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reports `503` when the backing store cannot answer a trivial query.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match state.unit_of_work.nfl.count_teams().await {
        Ok(_) => (StatusCode::OK, "healthy"),
        Err(err) => {
            warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    if let Some(postgres) = &state.postgres {
        let stats = postgres.pool_stats();
        debug!(size = stats.size, idle = stats.idle, max = stats.max_size, "database pool");
    }

    let overall = if status.is_success() { "healthy" } else { "unhealthy" };
    (
        status,
        Json(HealthResponse {
            status: overall.to_string(),
            database: database.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

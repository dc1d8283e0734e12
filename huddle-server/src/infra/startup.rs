use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::infra::app_state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[async_trait]
pub trait StartupHooks: Send + Sync {
    async fn run(&self, state: &AppState) -> Result<()>;
}

/// Reports reference data status and sweeps expired sessions in the
/// background.
#[derive(Debug, Default)]
pub struct ProdStartupHooks;

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        match state.unit_of_work.nfl.count_teams().await {
            Ok(0) => warn!("no NFL teams found; run `huddle-server db seed` before drafting"),
            Ok(teams) => info!(teams, "reference data present"),
            Err(err) => warn!(error = %err, "failed to inspect reference data"),
        }

        if state.service_key.is_none() {
            warn!("HUDDLE_SERVICE_KEY not set; admin endpoints will reject every request");
        }

        let accounts = state.accounts.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(err) = accounts.purge_expired_sessions(Utc::now()).await {
                    warn!(error = %err, "expired session sweep failed");
                }
            }
        });

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

#[async_trait]
impl StartupHooks for NoopStartupHooks {
    async fn run(&self, _state: &AppState) -> Result<()> {
        Ok(())
    }
}
